//! Renderable entities as the light pass sees them

use glam::{DQuat, DVec2, DVec3};
use serde::{Deserialize, Serialize};

/// Capabilities checked by the visibility mask
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightFlag {
    /// Never drawn in the light pass (debug quad, HUD, comets)
    ExcludeFromLight,
    /// Belongs to the craft hierarchy and catches light
    PartOfCraft,
}

impl LightFlag {
    const fn bit(self) -> u8 {
        match self {
            LightFlag::ExcludeFromLight => 1 << 0,
            LightFlag::PartOfCraft => 1 << 1,
        }
    }
}

/// Set of [`LightFlag`]s attached to an entity
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LightFlags(u8);

impl LightFlags {
    pub const NONE: Self = Self(0);

    pub fn contains(self, flag: LightFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    pub fn with(self, flag: LightFlag) -> Self {
        Self(self.0 | flag.bit())
    }

    pub fn insert(&mut self, flag: LightFlag) {
        self.0 |= flag.bit();
    }

    pub fn remove(&mut self, flag: LightFlag) {
        self.0 &= !flag.bit();
    }
}

impl From<LightFlag> for LightFlags {
    fn from(flag: LightFlag) -> Self {
        Self::NONE.with(flag)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u32);

/// What the light pass needs from a host scene
pub trait LightScene {
    fn entity_ids(&self) -> Vec<EntityId>;
    fn flags(&self, id: EntityId) -> LightFlags;
    fn is_visible(&self, id: EntityId) -> bool;
    fn set_visible(&mut self, id: EntityId, visible: bool);
    /// Marker channel that switches an entity's material to normal output
    fn is_marked(&self, id: EntityId) -> bool;
    fn set_marker(&mut self, id: EntityId, marked: bool);
}

/// Flat rectangle; local +Z is the surface normal
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Panel {
    pub center: DVec3,
    pub orientation: DQuat,
    pub half_extents: DVec2,
}

impl Panel {
    pub fn square(center: DVec3, orientation: DQuat, side: f64) -> Self {
        Self {
            center,
            orientation,
            half_extents: DVec2::splat(side * 0.5),
        }
    }

    pub fn normal(&self) -> DVec3 {
        self.orientation * DVec3::Z
    }

    /// Distance along the ray to the panel, if the ray hits it
    pub fn intersect(&self, origin: DVec3, direction: DVec3) -> Option<f64> {
        let normal = self.normal();
        let denom = direction.dot(normal);
        if denom.abs() < 1e-12 {
            return None;
        }
        let t = (self.center - origin).dot(normal) / denom;
        if t <= 0.0 {
            return None;
        }
        let local = self.orientation.inverse() * (origin + direction * t - self.center);
        (local.x.abs() <= self.half_extents.x && local.y.abs() <= self.half_extents.y).then_some(t)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    pub id: EntityId,
    pub name: String,
    pub flags: LightFlags,
    pub visible: bool,
    pub marker: bool,
    pub panel: Option<Panel>,
}

/// In-memory scene used by the reference renderer and tests
#[derive(Clone, Debug, Default)]
pub struct Scene {
    entities: Vec<Renderable>,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &str, flags: LightFlags, panel: Option<Panel>) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        self.entities.push(Renderable {
            id,
            name: name.to_string(),
            flags,
            visible: true,
            marker: false,
            panel,
        });
        id
    }

    pub fn get(&self, id: EntityId) -> Option<&Renderable> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Renderable> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn find(&self, name: &str) -> Option<&Renderable> {
        self.entities.iter().find(|e| e.name == name)
    }

    pub fn entities(&self) -> &[Renderable] {
        &self.entities
    }

    /// Ids of currently visible entities, sorted
    pub fn visible_set(&self) -> Vec<EntityId> {
        self.entities
            .iter()
            .filter(|e| e.visible)
            .map(|e| e.id)
            .collect()
    }

    pub fn set_panel(&mut self, id: EntityId, panel: Panel) -> bool {
        match self.get_mut(id) {
            Some(entity) => {
                entity.panel = Some(panel);
                true
            }
            None => false,
        }
    }
}

impl LightScene for Scene {
    fn entity_ids(&self) -> Vec<EntityId> {
        self.entities.iter().map(|e| e.id).collect()
    }

    fn flags(&self, id: EntityId) -> LightFlags {
        self.get(id).map(|e| e.flags).unwrap_or_default()
    }

    fn is_visible(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|e| e.visible)
    }

    fn set_visible(&mut self, id: EntityId, visible: bool) {
        if let Some(entity) = self.get_mut(id) {
            entity.visible = visible;
        }
    }

    fn is_marked(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|e| e.marker)
    }

    fn set_marker(&mut self, id: EntityId, marked: bool) {
        if let Some(entity) = self.get_mut(id) {
            entity.marker = marked;
        }
    }
}
