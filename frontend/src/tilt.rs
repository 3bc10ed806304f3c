//! Decorative pointer-follow tilt on the hero and the feature cards.

use std::cell::RefCell;
use std::rc::Rc;

use web_sys::{Document, DomRect, Element, HtmlElement, MouseEvent};

use crate::config::SiteConfig;
use crate::dom;
use crate::error::SiteError;

const SETTLE_EPSILON: f64 = 0.001;

/// Pointer position relative to the centre of `rect`, each axis in
/// [-0.5, 0.5] while the pointer is inside.
pub fn pointer_offset(client_x: f64, client_y: f64, rect: &Rect) -> (f64, f64) {
    if rect.width <= 0.0 || rect.height <= 0.0 {
        return (0.0, 0.0);
    }
    (
        (client_x - rect.left) / rect.width - 0.5,
        (client_y - rect.top) / rect.height - 0.5,
    )
}

/// Rotation in degrees (around X, around Y) for a pointer offset.
pub fn rotation_for(offset: (f64, f64), amount: f64) -> (f64, f64) {
    let (x, y) = offset;
    (-y * amount, x * amount)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl From<DomRect> for Rect {
    fn from(r: DomRect) -> Self {
        Self {
            left: r.left(),
            top: r.top(),
            width: r.width(),
            height: r.height(),
        }
    }
}

/// Exponentially damped rotation chasing a target.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Tilt {
    target: (f64, f64),
    current: (f64, f64),
}

impl Tilt {
    pub fn aim(&mut self, rotation: (f64, f64)) {
        self.target = rotation;
    }

    pub fn release(&mut self) {
        self.target = (0.0, 0.0);
    }

    pub fn current(&self) -> (f64, f64) {
        self.current
    }

    pub fn is_settled(&self) -> bool {
        (self.target.0 - self.current.0).abs() < SETTLE_EPSILON
            && (self.target.1 - self.current.1).abs() < SETTLE_EPSILON
    }

    /// Advances one frame; returns the new rotation.
    pub fn step(&mut self, damping: f64) -> (f64, f64) {
        self.current.0 += (self.target.0 - self.current.0) * damping;
        self.current.1 += (self.target.1 - self.current.1) * damping;
        self.current
    }
}

pub fn hero_transform((rx, ry): (f64, f64)) -> String {
    format!("perspective(1000px) rotateX({}deg) rotateY({}deg)", rx, ry)
}

pub fn card_transform((rx, ry): (f64, f64)) -> String {
    format!("translateY(-8px) rotateX({}deg) rotateY({}deg)", rx, ry)
}

pub fn init(doc: &Document, config: &SiteConfig) -> Result<(), SiteError> {
    init_hero(doc, config)?;
    init_cards(doc, config)
}

fn init_hero(doc: &Document, config: &SiteConfig) -> Result<(), SiteError> {
    let (Some(content), Some(hero)) = (
        dom::query::<HtmlElement>(doc, ".hero-content[data-tilt]"),
        dom::query::<Element>(doc, ".hero"),
    ) else {
        return Ok(());
    };
    let tilt = Rc::new(RefCell::new(Tilt::default()));
    let amount = config.hero_tilt_deg;

    {
        let tilt = tilt.clone();
        let area = hero.clone();
        dom::listen(&hero, "mousemove", move |e: MouseEvent| {
            let rect = Rect::from(area.get_bounding_client_rect());
            let offset = pointer_offset(e.client_x() as f64, e.client_y() as f64, &rect);
            tilt.borrow_mut().aim(rotation_for(offset, amount));
        })?;
    }
    {
        let tilt = tilt.clone();
        dom::listen(&hero, "mouseleave", move |_: MouseEvent| {
            tilt.borrow_mut().release();
        })?;
    }

    let damping = config.tilt_damping;
    let mut painted = false;
    dom::animation_loop(move |_| {
        let mut tilt = tilt.borrow_mut();
        if tilt.is_settled() && painted {
            return true;
        }
        let rotation = tilt.step(damping);
        dom::set_style(&content, "transform", &hero_transform(rotation));
        painted = true;
        true
    })
}

fn init_cards(doc: &Document, config: &SiteConfig) -> Result<(), SiteError> {
    let amount = config.card_tilt_deg;
    for card in dom::query_all::<HtmlElement>(doc, ".feature-card") {
        {
            let target = card.clone();
            dom::listen(&card, "mousemove", move |e: MouseEvent| {
                let rect = Rect::from(target.get_bounding_client_rect());
                let offset = pointer_offset(e.client_x() as f64, e.client_y() as f64, &rect);
                dom::set_style(&target, "transform", &card_transform(rotation_for(offset, amount)));
            })?;
        }
        {
            let target = card.clone();
            dom::listen(&card, "mouseleave", move |_: MouseEvent| {
                dom::set_style(&target, "transform", "");
            })?;
        }
    }
    Ok(())
}
