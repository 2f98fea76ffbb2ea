//! Scene elements and their customizations.
//!
//! The ambient layer of a scene is a set of elements - lights, a
//! background, a grid floor, free-moving props - each carrying a tagged
//! customization variant and an optional audio response target. Elements
//! are identified by stable string ids so presets round-trip.

use serde::{Deserialize, Serialize};

use crate::mapper::ResponseTarget;

/// Appearance fields shared by every responsive element kind.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElementStyle {
    /// Linear RGB, 0-1 per channel
    pub color: [f32; 3],
    pub opacity: f32,
    pub intensity: f32,
    pub response: ResponseTarget,
    /// When false the element ignores the audio entirely
    pub responsive: bool,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            color: [1.0, 1.0, 1.0],
            opacity: 1.0,
            intensity: 1.0,
            response: ResponseTarget::Overall,
            responsive: true,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeGeometry {
    Cube,
    Sphere,
    Cone,
    Torus,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbientKind {
    BouncingBall,
    FloatingParticle,
    FlyingBird,
    FloatingText,
    RotatingCube,
    PulsingSphere,
}

/// How an ambient prop travels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    Bounce,
    Float,
    Fly,
    Rotate,
    Pulse,
}

/// Per-kind element configuration, tagged by element type.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Customization {
    Particles {
        #[serde(flatten)]
        style: ElementStyle,
        size: f32,
        speed: f32,
        count: usize,
    },
    Light {
        #[serde(flatten)]
        style: ElementStyle,
        distance: f32,
        decay: f32,
    },
    Grid {
        #[serde(flatten)]
        style: ElementStyle,
        size: f32,
        divisions: usize,
        line_width: f32,
    },
    Background {
        color: [f32; 3],
        opacity: f32,
        /// Optional vertical gradient (top, bottom)
        gradient: Option<[[f32; 3]; 2]>,
    },
    Shape {
        #[serde(flatten)]
        style: ElementStyle,
        geometry: ShapeGeometry,
        size: f32,
        rotation_speed: f32,
        wireframe: bool,
    },
    Wave {
        #[serde(flatten)]
        style: ElementStyle,
        amplitude: f32,
        frequency: f32,
        speed: f32,
        points: usize,
    },
    Ambient {
        #[serde(flatten)]
        style: ElementStyle,
        element: AmbientKind,
        movement: MovementKind,
        size: f32,
        speed: f32,
        amplitude: f32,
        frequency: f32,
        bounce_height: f32,
    },
}

impl Customization {
    /// The shared style block, if this kind has one (backgrounds don't).
    pub fn style(&self) -> Option<&ElementStyle> {
        match self {
            Customization::Particles { style, .. }
            | Customization::Light { style, .. }
            | Customization::Grid { style, .. }
            | Customization::Shape { style, .. }
            | Customization::Wave { style, .. }
            | Customization::Ambient { style, .. } => Some(style),
            Customization::Background { .. } => None,
        }
    }

    pub fn style_mut(&mut self) -> Option<&mut ElementStyle> {
        match self {
            Customization::Particles { style, .. }
            | Customization::Light { style, .. }
            | Customization::Grid { style, .. }
            | Customization::Shape { style, .. }
            | Customization::Wave { style, .. }
            | Customization::Ambient { style, .. } => Some(style),
            Customization::Background { .. } => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Customization::Particles { .. } => "particles",
            Customization::Light { .. } => "light",
            Customization::Grid { .. } => "grid",
            Customization::Background { .. } => "background",
            Customization::Shape { .. } => "shape",
            Customization::Wave { .. } => "wave",
            Customization::Ambient { .. } => "ambient",
        }
    }
}

/// One element of the ambient scene layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualElement {
    pub id: String,
    pub name: String,
    pub visible: bool,
    pub position: [f32; 3],
    pub rotation: [f32; 3],
    pub scale: [f32; 3],
    pub customization: Customization,
}

impl VisualElement {
    pub fn new(id: &str, name: &str, customization: Customization) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            visible: true,
            position: [0.0; 3],
            rotation: [0.0; 3],
            scale: [1.0; 3],
            customization,
        }
    }

    pub fn at(mut self, position: [f32; 3]) -> Self {
        self.position = position;
        self
    }

    /// The element's response target; non-responsive elements and
    /// backgrounds report `None`.
    pub fn response(&self) -> Option<ResponseTarget> {
        self.customization
            .style()
            .filter(|s| s.responsive)
            .map(|s| s.response)
    }
}

/// Id-indexed element registry with stable iteration order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementSet {
    elements: Vec<VisualElement>,
}

impl ElementSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// The element layout every new scene starts with: background,
    /// particles, grid floor, ambient + directional light.
    pub fn default_scene() -> Self {
        let mut set = Self::new();

        set.insert(VisualElement::new(
            "background",
            "Background",
            Customization::Background {
                color: [0.04, 0.04, 0.04],
                opacity: 1.0,
                gradient: Some([[0.04, 0.04, 0.04], [0.10, 0.10, 0.18]]),
            },
        ));
        set.insert(VisualElement::new(
            "main-particles",
            "Main Particles",
            Customization::Particles {
                style: ElementStyle {
                    color: [0.0, 1.0, 0.53],
                    opacity: 0.8,
                    intensity: 1.0,
                    response: ResponseTarget::Bass,
                    responsive: true,
                },
                size: 0.1,
                speed: 1.0,
                count: 3000,
            },
        ));
        set.insert(VisualElement::new(
            "grid-lines",
            "Grid Lines",
            Customization::Grid {
                style: ElementStyle {
                    color: [0.0, 1.0, 0.53],
                    opacity: 0.6,
                    intensity: 1.0,
                    response: ResponseTarget::Mid,
                    responsive: true,
                },
                size: 20.0,
                divisions: 30,
                line_width: 1.0,
            },
        ));
        set.insert(VisualElement::new(
            "ambient-light",
            "Ambient Light",
            Customization::Light {
                style: ElementStyle {
                    response: ResponseTarget::Beat,
                    ..ElementStyle::default()
                },
                distance: 0.0,
                decay: 1.0,
            },
        ));
        set.insert(
            VisualElement::new(
                "directional-light",
                "Directional Light",
                Customization::Light {
                    style: ElementStyle {
                        response: ResponseTarget::Beat,
                        ..ElementStyle::default()
                    },
                    distance: 0.0,
                    decay: 1.0,
                },
            )
            .at([5.0, 5.0, 5.0]),
        );

        set
    }

    /// Insert or replace by id. Replacement keeps the element's slot so
    /// draw order stays stable.
    pub fn insert(&mut self, element: VisualElement) {
        if let Some(existing) = self.elements.iter_mut().find(|e| e.id == element.id) {
            *existing = element;
        } else {
            self.elements.push(element);
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<VisualElement> {
        let idx = self.elements.iter().position(|e| e.id == id)?;
        Some(self.elements.remove(idx))
    }

    pub fn get(&self, id: &str) -> Option<&VisualElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut VisualElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn toggle_visible(&mut self, id: &str) -> Option<bool> {
        let element = self.get_mut(id)?;
        element.visible = !element.visible;
        Some(element.visible)
    }

    pub fn iter(&self) -> impl Iterator<Item = &VisualElement> {
        self.elements.iter()
    }

    pub fn iter_visible(&self) -> impl Iterator<Item = &VisualElement> {
        self.elements.iter().filter(|e| e.visible)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_scene_has_stable_ids() {
        let set = ElementSet::default_scene();

        assert_eq!(set.len(), 5);
        assert!(set.get("background").is_some());
        assert!(set.get("directional-light").is_some());
        assert_eq!(
            set.get("directional-light").unwrap().position,
            [5.0, 5.0, 5.0]
        );
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut set = ElementSet::default_scene();
        let order_before: Vec<String> = set.iter().map(|e| e.id.clone()).collect();

        let mut replacement = set.get("grid-lines").unwrap().clone();
        replacement.visible = false;
        set.insert(replacement);

        let order_after: Vec<String> = set.iter().map(|e| e.id.clone()).collect();
        assert_eq!(order_before, order_after);
        assert!(!set.get("grid-lines").unwrap().visible);
    }

    #[test]
    fn response_honors_responsive_flag() {
        let mut set = ElementSet::default_scene();
        assert_eq!(
            set.get("main-particles").unwrap().response(),
            Some(ResponseTarget::Bass)
        );

        let particles = set.get_mut("main-particles").unwrap();
        particles
            .customization
            .style_mut()
            .unwrap()
            .responsive = false;
        assert_eq!(particles.response(), None);

        // Backgrounds never respond
        assert_eq!(set.get("background").unwrap().response(), None);
    }

    #[test]
    fn toggle_visible_flips_and_reports() {
        let mut set = ElementSet::default_scene();
        assert_eq!(set.toggle_visible("grid-lines"), Some(false));
        assert_eq!(set.toggle_visible("grid-lines"), Some(true));
        assert_eq!(set.toggle_visible("nope"), None);
        assert_eq!(set.iter_visible().count(), 5);
    }

    #[test]
    fn elements_round_trip_through_toml() {
        #[derive(Serialize, Deserialize)]
        struct Wrapper {
            elements: ElementSet,
        }

        let original = Wrapper {
            elements: ElementSet::default_scene(),
        };
        let text = toml::to_string(&original).unwrap();
        let loaded: Wrapper = toml::from_str(&text).unwrap();

        assert_eq!(loaded.elements, original.elements);
    }
}
