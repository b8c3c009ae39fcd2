//! F1AP UE context table
//!
//! Authoritative mapping between the CU- and DU-assigned UE identifiers and
//! the owning CU-CP's UE index. Contexts live in an arena of slots indexed
//! by a dense handle; the id maps point at slots, so removing and reusing a
//! slot never invalidates another context.
//!
//! Each context carries one event slot per procedure kind. A procedure arms
//! its slot before sending the request and suspends on the returned
//! receiver; the dispatcher resolves the slot when the matching outcome
//! arrives. Outcomes with no waiter are discarded - a late or duplicate
//! response is an expected race, not an error.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, error, warn};

use f1cu_common::UeIndex;
use f1cu_f1ap::ids::{GnbCuUeF1apId, GnbDuUeF1apId};
use f1cu_f1ap::messages::{
    UeContextModificationFailure, UeContextModificationResponse, UeContextReleaseComplete,
    UeContextSetupFailure, UeContextSetupResponse,
};

use super::id_pool::CuUeF1apIdPool;
use crate::notifiers::RrcSink;

/// Outcome delivered to a suspended UE Context Setup procedure.
#[derive(Debug)]
pub enum SetupEvent {
    /// DU answered with UE CONTEXT SETUP RESPONSE
    Response(UeContextSetupResponse),
    /// DU answered with UE CONTEXT SETUP FAILURE
    Failure(UeContextSetupFailure),
    /// UE context removed while the procedure was in flight
    Cancelled,
}

/// Outcome delivered to a suspended UE Context Modification procedure.
#[derive(Debug)]
pub enum ModificationEvent {
    /// DU answered with UE CONTEXT MODIFICATION RESPONSE
    Response(UeContextModificationResponse),
    /// DU answered with UE CONTEXT MODIFICATION FAILURE
    Failure(UeContextModificationFailure),
    /// UE context removed while the procedure was in flight
    Cancelled,
}

/// Outcome delivered to a suspended UE Context Release procedure.
#[derive(Debug)]
pub enum ReleaseEvent {
    /// DU answered with UE CONTEXT RELEASE COMPLETE
    Complete(UeContextReleaseComplete),
    /// UE context removed while the procedure was in flight
    Cancelled,
}

/// One outstanding-response slot: at most one unresolved waiter.
#[derive(Debug)]
struct EventSlot<T> {
    waiter: Option<oneshot::Sender<T>>,
}

impl<T> Default for EventSlot<T> {
    fn default() -> Self {
        Self { waiter: None }
    }
}

impl<T> EventSlot<T> {
    /// Arms the slot, returning the receiver the procedure suspends on.
    /// Any previously armed waiter is dropped (its receiver sees Cancelled
    /// via channel closure); the per-UE lane makes that case unreachable in
    /// normal operation.
    fn arm(&mut self) -> oneshot::Receiver<T> {
        let (tx, rx) = oneshot::channel();
        self.waiter = Some(tx);
        rx
    }

    /// Delivers an event to the waiter, if one is armed. Returns false when
    /// the event was discarded.
    fn resolve(&mut self, event: T) -> bool {
        match self.waiter.take() {
            Some(tx) => tx.send(event).is_ok(),
            None => false,
        }
    }

    fn disarm(&mut self) {
        self.waiter = None;
    }
}

/// Procedure kinds with a per-UE event slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcedureKind {
    /// UE Context Setup
    ContextSetup,
    /// UE Context Modification
    ContextModification,
    /// UE Context Release (awaiting RELEASE COMPLETE)
    ContextRelease,
}

impl std::fmt::Display for ProcedureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProcedureKind::ContextSetup => write!(f, "ContextSetup"),
            ProcedureKind::ContextModification => write!(f, "ContextModification"),
            ProcedureKind::ContextRelease => write!(f, "ContextRelease"),
        }
    }
}

/// Per-UE event slots, one per in-flight procedure kind.
#[derive(Debug, Default)]
struct UeEventSlots {
    setup: EventSlot<SetupEvent>,
    modification: EventSlot<ModificationEvent>,
    release: EventSlot<ReleaseEvent>,
}

/// F1AP UE context, one per admitted UE.
pub struct UeContext {
    /// Handle into the owning CU-CP's UE registry
    pub ue_index: UeIndex,
    /// CU-assigned id; immutable once assigned
    pub cu_ue_id: GnbCuUeF1apId,
    /// DU-assigned id; set once, on the first message that carries it
    pub du_ue_id: Option<GnbDuUeF1apId>,
    /// Previous DU-assigned id during a reestablishment window; surfaced in
    /// the next DL RRC transfer, then cleared
    pub pending_old_du_ue_id: Option<GnbDuUeF1apId>,
    /// Once set, duplicate peer-initiated release requests are ignored
    pub release_marked: bool,
    /// RRC delivery sink obtained at admission
    pub rrc: Arc<dyn RrcSink>,
    /// Sequential lane: procedures for this UE run one at a time
    pub lane: Arc<tokio::sync::Mutex<()>>,
    events: UeEventSlots,
}

impl std::fmt::Debug for UeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UeContext")
            .field("ue_index", &self.ue_index)
            .field("cu_ue_id", &self.cu_ue_id)
            .field("du_ue_id", &self.du_ue_id)
            .field("pending_old_du_ue_id", &self.pending_old_du_ue_id)
            .field("release_marked", &self.release_marked)
            .finish()
    }
}

/// UE context table shared between the dispatcher task and the procedures
/// running on caller tasks. Locked only for short synchronous sections,
/// never across an await.
pub type SharedUeContextTable = Arc<std::sync::Mutex<UeContextTable>>;

/// Locks the shared table. A poisoned lock means a panic elsewhere; the
/// table state itself stays consistent, so we keep going with it.
pub(crate) fn lock(table: &SharedUeContextTable) -> std::sync::MutexGuard<'_, UeContextTable> {
    table
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Arena-backed table of UE contexts with id-keyed side maps and the CU UE
/// F1AP id pool.
pub struct UeContextTable {
    slots: Vec<Option<UeContext>>,
    free_slots: Vec<usize>,
    by_cu_id: HashMap<GnbCuUeF1apId, usize>,
    by_du_id: HashMap<GnbDuUeF1apId, usize>,
    by_ue_index: HashMap<UeIndex, usize>,
    id_pool: CuUeF1apIdPool,
}

impl UeContextTable {
    /// Creates an empty table serving at most `max_ues` UEs.
    pub fn new(max_ues: usize) -> Self {
        Self {
            slots: Vec::new(),
            free_slots: Vec::new(),
            by_cu_id: HashMap::new(),
            by_du_id: HashMap::new(),
            by_ue_index: HashMap::new(),
            id_pool: CuUeF1apIdPool::new(max_ues),
        }
    }

    /// Allocates a CU UE F1AP id for a context about to be created, or
    /// `None` when the pool is exhausted.
    pub fn allocate_cu_ue_id(&mut self) -> Option<GnbCuUeF1apId> {
        self.id_pool.allocate()
    }

    /// Returns an id allocated by `allocate_cu_ue_id` that never became a
    /// context (aborted admission).
    pub fn release_cu_ue_id(&mut self, id: GnbCuUeF1apId) {
        self.id_pool.release(id);
    }

    /// Creates a context for a newly admitted UE. Fails if the CU id or the
    /// UE index is already present.
    pub fn add_ue(
        &mut self,
        ue_index: UeIndex,
        cu_ue_id: GnbCuUeF1apId,
        rrc: Arc<dyn RrcSink>,
    ) -> bool {
        if self.by_cu_id.contains_key(&cu_ue_id) || self.by_ue_index.contains_key(&ue_index) {
            error!("{ue_index} {cu_ue_id}: UE context already exists");
            return false;
        }

        let ctx = UeContext {
            ue_index,
            cu_ue_id,
            du_ue_id: None,
            pending_old_du_ue_id: None,
            release_marked: false,
            rrc,
            lane: Arc::new(tokio::sync::Mutex::new(())),
            events: UeEventSlots::default(),
        };

        let slot = match self.free_slots.pop() {
            Some(i) => {
                self.slots[i] = Some(ctx);
                i
            }
            None => {
                self.slots.push(Some(ctx));
                self.slots.len() - 1
            }
        };

        self.by_cu_id.insert(cu_ue_id, slot);
        self.by_ue_index.insert(ue_index, slot);
        debug!("{ue_index} {cu_ue_id}: Added UE context");
        true
    }

    /// Looks up a context by CU-assigned id.
    pub fn get(&self, cu_ue_id: GnbCuUeF1apId) -> Option<&UeContext> {
        self.by_cu_id
            .get(&cu_ue_id)
            .and_then(|&i| self.slots[i].as_ref())
    }

    /// Looks up a mutable context by CU-assigned id.
    pub fn get_mut(&mut self, cu_ue_id: GnbCuUeF1apId) -> Option<&mut UeContext> {
        match self.by_cu_id.get(&cu_ue_id) {
            Some(&i) => self.slots[i].as_mut(),
            None => None,
        }
    }

    /// Looks up a context by DU-assigned id. Only succeeds after the id has
    /// been learned via `bind_du_ue_id`.
    pub fn get_by_du_id(&self, du_ue_id: GnbDuUeF1apId) -> Option<&UeContext> {
        self.by_du_id
            .get(&du_ue_id)
            .and_then(|&i| self.slots[i].as_ref())
    }

    /// Looks up a context by the owning CU-CP's UE index.
    pub fn get_by_ue_index(&self, ue_index: UeIndex) -> Option<&UeContext> {
        self.by_ue_index
            .get(&ue_index)
            .and_then(|&i| self.slots[i].as_ref())
    }

    /// Looks up a mutable context by UE index.
    pub fn get_by_ue_index_mut(&mut self, ue_index: UeIndex) -> Option<&mut UeContext> {
        match self.by_ue_index.get(&ue_index) {
            Some(&i) => self.slots[i].as_mut(),
            None => None,
        }
    }

    /// Returns true if a context exists for the CU-assigned id.
    pub fn contains(&self, cu_ue_id: GnbCuUeF1apId) -> bool {
        self.by_cu_id.contains_key(&cu_ue_id)
    }

    /// Records the DU-assigned id for a UE. The binding is set once;
    /// rebinding with a different value is a protocol error and is refused.
    pub fn bind_du_ue_id(&mut self, cu_ue_id: GnbCuUeF1apId, du_ue_id: GnbDuUeF1apId) -> bool {
        let slot = match self.by_cu_id.get(&cu_ue_id) {
            Some(&i) => i,
            None => {
                warn!("{cu_ue_id}: Cannot bind {du_ue_id}. UE context does not exist");
                return false;
            }
        };

        if let Some(&other) = self.by_du_id.get(&du_ue_id) {
            if other != slot {
                error!("{du_ue_id}: Already bound to another UE context");
                return false;
            }
        }

        let ctx = self.slots[slot].as_mut().unwrap_or_else(|| unreachable!());
        match ctx.du_ue_id {
            None => {
                ctx.du_ue_id = Some(du_ue_id);
                self.by_du_id.insert(du_ue_id, slot);
                true
            }
            Some(existing) if existing == du_ue_id => true,
            Some(existing) => {
                error!("{cu_ue_id}: Rejecting rebind of {existing} to {du_ue_id}");
                false
            }
        }
    }

    /// Records a predecessor DU id to surface in the next DL RRC transfer.
    pub fn set_pending_old_du_ue_id(
        &mut self,
        cu_ue_id: GnbCuUeF1apId,
        old_du_ue_id: GnbDuUeF1apId,
    ) -> bool {
        match self.get_mut(cu_ue_id) {
            Some(ctx) => {
                ctx.pending_old_du_ue_id = Some(old_du_ue_id);
                true
            }
            None => false,
        }
    }

    /// Consumes the pending predecessor DU id, if any.
    pub fn take_pending_old_du_ue_id(&mut self, cu_ue_id: GnbCuUeF1apId) -> Option<GnbDuUeF1apId> {
        self.get_mut(cu_ue_id)
            .and_then(|ctx| ctx.pending_old_du_ue_id.take())
    }

    /// Marks a UE as release-pending. Returns the previous value, so the
    /// caller can tell a duplicate from the first request.
    pub fn mark_release(&mut self, cu_ue_id: GnbCuUeF1apId) -> Option<bool> {
        self.get_mut(cu_ue_id).map(|ctx| {
            let was = ctx.release_marked;
            ctx.release_marked = true;
            was
        })
    }

    /// Removes a context from every index, returning the id to the pool and
    /// resolving any armed event slot with `Cancelled`. Safe to call on an
    /// id already removed.
    pub fn remove_ue(&mut self, cu_ue_id: GnbCuUeF1apId) {
        let slot = match self.by_cu_id.remove(&cu_ue_id) {
            Some(i) => i,
            None => return,
        };
        let mut ctx = match self.slots[slot].take() {
            Some(c) => c,
            None => return,
        };

        self.by_ue_index.remove(&ctx.ue_index);
        if let Some(du_id) = ctx.du_ue_id {
            self.by_du_id.remove(&du_id);
        }
        self.id_pool.release(cu_ue_id);
        self.free_slots.push(slot);

        // Wake any in-flight procedure exactly once with a cancel outcome.
        ctx.events.setup.resolve(SetupEvent::Cancelled);
        ctx.events.modification.resolve(ModificationEvent::Cancelled);
        ctx.events.release.resolve(ReleaseEvent::Cancelled);

        debug!("{} {cu_ue_id}: Removed UE context", ctx.ue_index);
    }

    /// Number of live UE contexts.
    pub fn len(&self) -> usize {
        self.by_cu_id.len()
    }

    /// Returns true if no UE contexts exist.
    pub fn is_empty(&self) -> bool {
        self.by_cu_id.is_empty()
    }

    // ------------------------------------------------------------------
    // Event slots
    // ------------------------------------------------------------------

    /// Arms the setup slot for a UE, returning the receiver to suspend on.
    pub fn arm_setup(&mut self, cu_ue_id: GnbCuUeF1apId) -> Option<oneshot::Receiver<SetupEvent>> {
        self.get_mut(cu_ue_id).map(|ctx| ctx.events.setup.arm())
    }

    /// Arms the modification slot for a UE.
    pub fn arm_modification(
        &mut self,
        cu_ue_id: GnbCuUeF1apId,
    ) -> Option<oneshot::Receiver<ModificationEvent>> {
        self.get_mut(cu_ue_id)
            .map(|ctx| ctx.events.modification.arm())
    }

    /// Arms the release-complete slot for a UE.
    pub fn arm_release(
        &mut self,
        cu_ue_id: GnbCuUeF1apId,
    ) -> Option<oneshot::Receiver<ReleaseEvent>> {
        self.get_mut(cu_ue_id).map(|ctx| ctx.events.release.arm())
    }

    /// Clears an armed slot after the awaiting procedure gave up (timeout).
    pub fn disarm(&mut self, cu_ue_id: GnbCuUeF1apId, kind: ProcedureKind) {
        if let Some(ctx) = self.get_mut(cu_ue_id) {
            match kind {
                ProcedureKind::ContextSetup => ctx.events.setup.disarm(),
                ProcedureKind::ContextModification => ctx.events.modification.disarm(),
                ProcedureKind::ContextRelease => ctx.events.release.disarm(),
            }
        }
    }

    /// Delivers a setup outcome into the UE's event slot, waking the
    /// suspended procedure. Late, duplicate or unknown-UE outcomes are
    /// discarded with a log.
    pub fn resolve_setup(&mut self, cu_ue_id: GnbCuUeF1apId, event: SetupEvent) {
        match self.get_mut(cu_ue_id) {
            Some(ctx) => {
                if !ctx.events.setup.resolve(event) {
                    debug!("{cu_ue_id}: Discarding ContextSetup outcome. No procedure awaiting it");
                }
            }
            None => debug!("{cu_ue_id}: Discarding ContextSetup outcome. UE context does not exist"),
        }
    }

    /// Delivers a modification outcome, same discard rules as setup.
    pub fn resolve_modification(&mut self, cu_ue_id: GnbCuUeF1apId, event: ModificationEvent) {
        match self.get_mut(cu_ue_id) {
            Some(ctx) => {
                if !ctx.events.modification.resolve(event) {
                    debug!(
                        "{cu_ue_id}: Discarding ContextModification outcome. No procedure awaiting it"
                    );
                }
            }
            None => debug!(
                "{cu_ue_id}: Discarding ContextModification outcome. UE context does not exist"
            ),
        }
    }

    /// Delivers a release-complete outcome, same discard rules as setup.
    pub fn resolve_release(&mut self, cu_ue_id: GnbCuUeF1apId, event: ReleaseEvent) {
        match self.get_mut(cu_ue_id) {
            Some(ctx) => {
                if !ctx.events.release.resolve(event) {
                    debug!(
                        "{cu_ue_id}: Discarding ContextRelease outcome. No procedure awaiting it"
                    );
                }
            }
            None => {
                debug!("{cu_ue_id}: Discarding ContextRelease outcome. UE context does not exist")
            }
        }
    }
}
