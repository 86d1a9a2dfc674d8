//! Scene visibility for the light pass
//!
//! Applying the mask hides everything flagged [`LightFlag::ExcludeFromLight`]
//! and shows and marks the craft. The returned guard undoes exactly those
//! changes when dropped, so an early return from a failed render cannot leave
//! the scene half-masked.

use crate::scene::{EntityId, LightFlag, LightScene};
use std::ops::{Deref, DerefMut};
use tracing::trace;

/// Remembers what it changed so it can put it back; buffers are reused
#[derive(Debug, Default)]
pub struct VisibilityMask {
    hidden: Vec<EntityId>,
    revealed: Vec<EntityId>,
    tagged: Vec<EntityId>,
}

impl VisibilityMask {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mask `scene` for a light pass
    pub fn apply<'a, S: LightScene + ?Sized>(&'a mut self, scene: &'a mut S) -> VisibilityGuard<'a, S> {
        self.hidden.clear();
        self.revealed.clear();
        self.tagged.clear();

        let ids = scene.entity_ids();

        for &id in &ids {
            if scene.flags(id).contains(LightFlag::ExcludeFromLight) && scene.is_visible(id) {
                scene.set_visible(id, false);
                self.hidden.push(id);
            }
        }

        for &id in &ids {
            let flags = scene.flags(id);
            if !flags.contains(LightFlag::PartOfCraft) || flags.contains(LightFlag::ExcludeFromLight) {
                continue;
            }
            if !scene.is_visible(id) {
                scene.set_visible(id, true);
                self.revealed.push(id);
            }
            scene.set_marker(id, true);
            self.tagged.push(id);
        }

        trace!(
            hidden = self.hidden.len(),
            revealed = self.revealed.len(),
            tagged = self.tagged.len(),
            "light mask applied"
        );

        VisibilityGuard {
            mask: self,
            scene,
            restored: false,
        }
    }
}

/// Masked scene; restores visibility and markers on drop
pub struct VisibilityGuard<'a, S: LightScene + ?Sized> {
    mask: &'a mut VisibilityMask,
    scene: &'a mut S,
    restored: bool,
}

impl<S: LightScene + ?Sized> VisibilityGuard<'_, S> {
    pub fn tagged(&self) -> &[EntityId] {
        &self.mask.tagged
    }

    pub fn hidden(&self) -> &[EntityId] {
        &self.mask.hidden
    }

    /// Undo the mask now instead of at drop
    pub fn restore(mut self) {
        self.undo();
    }

    fn undo(&mut self) {
        if self.restored {
            return;
        }
        for &id in &self.mask.tagged {
            self.scene.set_marker(id, false);
        }
        for &id in &self.mask.revealed {
            self.scene.set_visible(id, false);
        }
        for &id in &self.mask.hidden {
            self.scene.set_visible(id, true);
        }
        self.restored = true;
    }
}

impl<S: LightScene + ?Sized> Deref for VisibilityGuard<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        &*self.scene
    }
}

impl<S: LightScene + ?Sized> DerefMut for VisibilityGuard<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        &mut *self.scene
    }
}

impl<S: LightScene + ?Sized> Drop for VisibilityGuard<'_, S> {
    fn drop(&mut self) {
        self.undo();
    }
}
