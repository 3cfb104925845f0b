//! DOM render port and page bindings
//!
//! Viruses are `div.virus` children of the game canvas, tagged with
//! `data-virus-id` so a single delegated click handler can resolve them.
//! Sparks are small absolutely positioned dots.

use std::collections::HashMap;

use glam::Vec2;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use crate::renderer::RenderPort;
use crate::sim::{Hud, ObjectId, Particle, StatusLabel};

/// Attribute carrying the virus id on its element
pub const VIRUS_ID_ATTR: &str = "data-virus-id";

/// Attribute holding an optional JSON tuning override on the canvas
pub const TUNING_ATTR: &str = "data-tuning";

const SPARK_STYLE: &str = "position: absolute; width: 8px; height: 8px; \
    background: #00ffcc; border-radius: 50%; pointer-events: none; \
    box-shadow: 0 0 10px rgba(0, 255, 204, 0.8);";

fn get_html(document: &Document, id: &str) -> Result<HtmlElement, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing #{id}")))?
        .dyn_into::<HtmlElement>()
        .map_err(|_| JsValue::from_str(&format!("#{id} is not an HTML element")))
}

fn set_px(element: &HtmlElement, property: &str, value: f32) -> Result<(), JsValue> {
    element.style().set_property(property, &format!("{value}px"))
}

/// Every page element the shell touches
pub struct Page {
    pub document: Document,
    pub body: HtmlElement,
    pub section: HtmlElement,
    pub canvas: HtmlElement,
    pub open_button: HtmlElement,
    pub close_button: HtmlElement,
    pub start_button: HtmlElement,
    pub restart_button: HtmlElement,
    pub start_panel: HtmlElement,
    pub over_panel: HtmlElement,
    pub score: HtmlElement,
    pub threats: HtmlElement,
    pub status: HtmlElement,
    pub final_score: HtmlElement,
}

impl Page {
    pub fn find(document: Document) -> Result<Self, JsValue> {
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("document has no body"))?;
        let section = document
            .query_selector(".game-section")?
            .ok_or_else(|| JsValue::from_str("missing .game-section"))?
            .dyn_into::<HtmlElement>()
            .map_err(|_| JsValue::from_str(".game-section is not an HTML element"))?;

        Ok(Self {
            body,
            section,
            canvas: get_html(&document, "gameCanvas")?,
            open_button: get_html(&document, "gameBtn")?,
            close_button: get_html(&document, "gameClose")?,
            start_button: get_html(&document, "startBtn")?,
            restart_button: get_html(&document, "restartBtn")?,
            start_panel: get_html(&document, "gameStart")?,
            over_panel: get_html(&document, "gameOver")?,
            score: get_html(&document, "score")?,
            threats: get_html(&document, "threats")?,
            status: get_html(&document, "status")?,
            final_score: get_html(&document, "finalScore")?,
            document,
        })
    }

    /// Current canvas size in CSS pixels
    pub fn canvas_size(&self) -> (f32, f32) {
        (
            self.canvas.client_width() as f32,
            self.canvas.client_height() as f32,
        )
    }

    /// JSON tuning override, if the page provides one
    pub fn tuning_override(&self) -> Option<String> {
        self.canvas.get_attribute(TUNING_ATTR)
    }

    /// Show or hide the overlay, locking page scroll while it is open
    pub fn set_overlay(&self, open: bool) -> Result<(), JsValue> {
        let classes = self.section.class_list();
        if open {
            classes.add_1("active")?;
        } else {
            classes.remove_1("active")?;
        }
        self.body
            .style()
            .set_property("overflow", if open { "hidden" } else { "auto" })
    }

    /// Push HUD values into the page
    pub fn apply_hud(&self, hud: &Hud) -> Result<(), JsValue> {
        self.score.set_text_content(Some(&hud.score.to_string()));
        self.threats
            .set_text_content(Some(&hud.destroyed.to_string()));

        // Idle keeps whatever the last session showed
        if let Some(label) = hud.status {
            self.status.set_text_content(Some(label.as_str()));
            let classes = self.status.class_list();
            let breach = label == StatusLabel::Breach;
            classes.toggle_with_force("status-active", !breach)?;
            classes.toggle_with_force("status-breach", breach)?;
        }

        self.start_panel.style().set_property(
            "display",
            if hud.status.is_none() { "block" } else { "none" },
        )?;

        match hud.final_score {
            Some(score) => {
                self.final_score.set_text_content(Some(&score.to_string()));
                self.over_panel.class_list().add_1("active")?;
            }
            None => self.over_panel.class_list().remove_1("active")?,
        }
        Ok(())
    }
}

/// Virus id of the element a click landed on, if any
pub fn virus_id_of(target: &Element) -> Option<ObjectId> {
    let virus = target.closest(".virus").ok().flatten()?;
    virus.get_attribute(VIRUS_ID_ATTR)?.parse().ok()
}

/// Draws the game with DOM elements inside the canvas div
pub struct DomRenderer {
    document: Document,
    canvas: HtmlElement,
    viruses: HashMap<ObjectId, HtmlElement>,
    bursts: HashMap<ObjectId, Vec<HtmlElement>>,
}

impl DomRenderer {
    pub fn new(document: Document, canvas: HtmlElement) -> Self {
        Self {
            document,
            canvas,
            viruses: HashMap::new(),
            bursts: HashMap::new(),
        }
    }

    fn create_div(&self) -> Result<HtmlElement, JsValue> {
        let element = self
            .document
            .create_element("div")?
            .dyn_into::<HtmlElement>()
            .map_err(|_| JsValue::from_str("div is not an HTML element"))?;
        self.canvas.append_child(&element)?;
        Ok(element)
    }

    fn try_create_object(&mut self, id: ObjectId, pos: Vec2) -> Result<(), JsValue> {
        let element = self.create_div()?;
        element.set_class_name("virus");
        element.set_attribute(VIRUS_ID_ATTR, &id.to_string())?;
        set_px(&element, "left", pos.x)?;
        set_px(&element, "top", pos.y)?;
        self.viruses.insert(id, element);
        Ok(())
    }

    fn try_create_burst(&mut self, id: ObjectId, particles: &[Particle]) -> Result<(), JsValue> {
        let mut sparks = Vec::with_capacity(particles.len());
        for particle in particles {
            let spark = self.create_div()?;
            spark.set_attribute("style", SPARK_STYLE)?;
            set_px(&spark, "left", particle.pos.x)?;
            set_px(&spark, "top", particle.pos.y)?;
            sparks.push(spark);
        }
        self.bursts.insert(id, sparks);
        Ok(())
    }

    fn try_update_burst(&mut self, id: ObjectId, particles: &[Particle]) -> Result<(), JsValue> {
        let Some(sparks) = self.bursts.get_mut(&id) else {
            return Ok(());
        };
        // Faded sparks drop out of the simulation together, from the back
        let keep = particles.len().min(sparks.len());
        for spark in sparks.drain(keep..) {
            spark.remove();
        }
        for (spark, particle) in sparks.iter().zip(particles) {
            set_px(spark, "left", particle.pos.x)?;
            set_px(spark, "top", particle.pos.y)?;
            spark
                .style()
                .set_property("opacity", &particle.opacity.max(0.0).to_string())?;
        }
        Ok(())
    }
}

impl RenderPort for DomRenderer {
    fn create_object(&mut self, id: ObjectId, pos: Vec2) {
        if let Err(e) = self.try_create_object(id, pos) {
            log::warn!("Failed to draw virus {}: {:?}", id, e);
        }
    }

    fn move_object(&mut self, id: ObjectId, pos: Vec2) {
        if let Some(element) = self.viruses.get(&id) {
            if let Err(e) = set_px(element, "top", pos.y) {
                log::warn!("Failed to move virus {}: {:?}", id, e);
            }
        }
    }

    fn mark_destroyed(&mut self, id: ObjectId) {
        if let Some(element) = self.viruses.get(&id) {
            if let Err(e) = element.class_list().add_1("virus-destroyed") {
                log::warn!("Failed to flag virus {}: {:?}", id, e);
            }
        }
    }

    fn remove_object(&mut self, id: ObjectId) {
        if let Some(element) = self.viruses.remove(&id) {
            element.remove();
        }
    }

    fn create_burst(&mut self, id: ObjectId, particles: &[Particle]) {
        if let Err(e) = self.try_create_burst(id, particles) {
            log::warn!("Failed to draw burst {}: {:?}", id, e);
        }
    }

    fn update_burst(&mut self, id: ObjectId, particles: &[Particle]) {
        if let Err(e) = self.try_update_burst(id, particles) {
            log::warn!("Failed to animate burst {}: {:?}", id, e);
        }
    }

    fn remove_burst(&mut self, id: ObjectId) {
        for spark in self.bursts.remove(&id).unwrap_or_default() {
            spark.remove();
        }
    }
}
