//! # Realtime Re-filtering
//!
//! Updates pushed by the data store's subscription channel do not pass
//! through the row filter applied to queries. Every pushed item is
//! therefore re-checked with [`can_access_location`] before it reaches a
//! user-visible channel. The relay is a plain message-passing stage: it
//! owns the inbound receiver and forwards allowed items onto a fresh
//! bounded channel.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use vnscope_core::{JurisdictionScope, ProvinceCode, WardCode};

use crate::evaluator::can_access_location;

/// Anything that carries administrative location codes.
pub trait LocationTagged {
    fn province_code(&self) -> Option<ProvinceCode>;
    fn ward_code(&self) -> Option<WardCode>;
}

fn permitted<T: LocationTagged>(scope: &JurisdictionScope, item: &T) -> bool {
    can_access_location(scope, item.province_code(), item.ward_code()).allowed
}

/// Keep only the items `scope` may see.
pub fn filter_batch<T, I>(scope: &JurisdictionScope, items: I) -> Vec<T>
where
    T: LocationTagged,
    I: IntoIterator<Item = T>,
{
    items
        .into_iter()
        .filter(|item| permitted(scope, item))
        .collect()
}

/// Spawn a relay forwarding permitted items from `inbound`.
///
/// The task ends when `inbound` closes or the returned receiver is
/// dropped.
pub fn spawn_scoped_relay<T>(
    scope: JurisdictionScope,
    mut inbound: mpsc::Receiver<T>,
    capacity: usize,
) -> (mpsc::Receiver<T>, JoinHandle<()>)
where
    T: LocationTagged + Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity.max(1));
    let handle = tokio::spawn(async move {
        let mut dropped: u64 = 0;
        while let Some(item) = inbound.recv().await {
            if !permitted(&scope, &item) {
                dropped += 1;
                tracing::debug!(
                    province = ?item.province_code(),
                    ward = ?item.ward_code(),
                    "dropping out-of-scope realtime update"
                );
                continue;
            }
            if tx.send(item).await.is_err() {
                break;
            }
        }
        tracing::debug!(dropped, scope = %scope.label(), "realtime relay stopped");
    });
    (rx, handle)
}
