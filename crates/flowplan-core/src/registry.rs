use crate::model::{DecodedSheet, Role};

/// An uploaded source file, kept verbatim.
///
/// The optimization request transmits these bytes, never the decoded rows,
/// so what the service receives cannot diverge from what was uploaded.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

/// One decoded upload occupying a role slot.
#[derive(Debug, Clone)]
pub struct UploadedDataset {
    pub file: SourceFile,
    pub sheet: DecodedSheet,
}

/// Holds the three datasets an optimization run needs.
///
/// Every mutation is whole-value: `set` replaces the slot, `clear` drops
/// the decoded sheet together with the file, so no stale preview can
/// outlive its backing upload. Roles may be filled in any order.
#[derive(Debug, Clone, Default)]
pub struct DatasetRegistry {
    sites: Option<UploadedDataset>,
    markets: Option<UploadedDataset>,
    transport: Option<UploadedDataset>,
}

impl DatasetRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, role: Role, file: SourceFile, sheet: DecodedSheet) {
        *self.slot_mut(role) = Some(UploadedDataset { file, sheet });
    }

    pub fn clear(&mut self, role: Role) {
        *self.slot_mut(role) = None;
    }

    pub fn get(&self, role: Role) -> Option<&UploadedDataset> {
        match role {
            Role::Sites => self.sites.as_ref(),
            Role::Markets => self.markets.as_ref(),
            Role::Transport => self.transport.as_ref(),
        }
    }

    /// Ready when every role has been set since its last clear.
    pub fn is_ready(&self) -> bool {
        Role::ALL.iter().all(|role| self.get(*role).is_some())
    }

    pub fn missing_roles(&self) -> Vec<Role> {
        Role::ALL
            .iter()
            .copied()
            .filter(|role| self.get(*role).is_none())
            .collect()
    }

    fn slot_mut(&mut self, role: Role) -> &mut Option<UploadedDataset> {
        match role {
            Role::Sites => &mut self.sites,
            Role::Markets => &mut self.markets,
            Role::Transport => &mut self.transport,
        }
    }
}
