//! Two-phase device resource loading
//!
//! Phase one builds materials on a loader thread and must not touch any
//! simulation state. Its result travels over a one-slot channel and is taken
//! exactly once by [`finalize`], which runs on the update thread and is the
//! only place materials are attached to entities.

use std::thread;

use crossbeam::channel::{Receiver, TryRecvError, bounded};
use thiserror::Error;

use crate::render::Material;
use crate::sim::{MaterialSlot, Role, World};

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("failed to create {what}: {reason}")]
    Build { what: String, reason: String },
    #[error("resource loader stopped before delivering a result")]
    Disconnected,
}

/// Everything the loader produces
#[derive(Debug, Clone, Default)]
pub struct DeviceResources {
    pub materials: Vec<Material>,
}

impl DeviceResources {
    /// One material per role
    pub fn create() -> Result<Self, ResourceError> {
        let materials = [Role::Player, Role::Opponent, Role::Terrain]
            .into_iter()
            .map(Material::for_role)
            .collect();
        Ok(Self { materials })
    }

    /// Slot of the material for `role`
    pub fn slot_for(&self, role: Role) -> Option<MaterialSlot> {
        self.materials.iter().position(|m| m.role == role).map(MaterialSlot)
    }
}

/// Pending result of a background load
pub struct ResourceFuture {
    receiver: Receiver<Result<DeviceResources, ResourceError>>,
}

impl std::fmt::Debug for ResourceFuture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceFuture").finish_non_exhaustive()
    }
}

impl ResourceFuture {
    /// Already-finished future (synchronous loads and tests)
    pub fn ready(result: Result<DeviceResources, ResourceError>) -> Self {
        let (tx, rx) = bounded(1);
        let _ = tx.send(result);
        Self { receiver: rx }
    }

    /// `Ok(None)` while the loader is still working
    pub fn try_wait(&self) -> Result<Option<DeviceResources>, ResourceError> {
        match self.receiver.try_recv() {
            Ok(result) => result.map(Some),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(ResourceError::Disconnected),
        }
    }

    /// Block until the loader finishes
    pub fn wait(self) -> Result<DeviceResources, ResourceError> {
        self.receiver.recv().map_err(|_| ResourceError::Disconnected)?
    }
}

/// Run `build` on a loader thread
pub fn spawn_load<F>(build: F) -> ResourceFuture
where
    F: FnOnce() -> Result<DeviceResources, ResourceError> + Send + 'static,
{
    let (tx, rx) = bounded(1);
    thread::spawn(move || {
        let result = build();
        if let Err(e) = &result {
            log::error!("Device resource build failed: {}", e);
        }
        let _ = tx.send(result);
    });
    ResourceFuture { receiver: rx }
}

/// Attach materials to every entity by role (update thread only)
pub fn finalize(resources: &DeviceResources, world: &mut World) {
    for entity in world.entities_mut() {
        entity.material = resources.slot_for(entity.role);
        if entity.material.is_none() {
            log::warn!("No material for {:?} entity {:?}", entity.role, entity.id);
        }
    }
    log::info!("Attached {} materials", resources.materials.len());
}
