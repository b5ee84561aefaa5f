//! Atomic order placement.
//!
//! One call creates the order, prices and records its line, and reserves
//! stock through the store's inventory procedure. Every step runs inside a
//! single transaction opened through [`TransactionScope`]; the whole
//! sequence is either committed or rolled back, and the session's
//! auto-commit flag is put back afterwards on every path.

use std::fmt;

use thiserror::Error;

use super::transaction::TransactionScope;
use crate::domain::errors::{InventoryCallError, PriceLookupError, StoreError};
use crate::domain::order::{ItemId, OrderId, OrderLineInput, PlacementRequest};
use crate::domain::ports::{InventoryGuard, OrderStore, TransactionControl};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementState {
    Idle,
    TransactionOpen,
    OrderCreated,
    PriceResolved,
    LineRecorded,
    InventoryReserved,
    Committed,
    RolledBack,
}

/// The step that was running when placement stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    OpenTransaction,
    CreateOrder,
    ResolvePrice,
    RecordLine,
    ReserveInventory,
    Commit,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Step::OpenTransaction => "open transaction",
            Step::CreateOrder => "create order",
            Step::ResolvePrice => "resolve price",
            Step::RecordLine => "record order line",
            Step::ReserveInventory => "reserve inventory",
            Step::Commit => "commit",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum FailureKind {
    #[error("Order creation failed: {0}")]
    OrderCreation(String),
    #[error("Item {item_id} not found")]
    ItemNotFound { item_id: ItemId },
    #[error("Insufficient inventory for item {item_id} (requested {requested})")]
    InsufficientInventory { item_id: ItemId, requested: i32 },
    #[error(transparent)]
    PriceLookup(#[from] PriceLookupError),
    #[error(transparent)]
    InventoryCall(#[from] InventoryCallError),
    #[error("Order line could not be recorded: {0}")]
    LineRecording(#[source] StoreError),
    #[error("Commit failed: {0}")]
    Commit(#[source] StoreError),
}

/// A rejection the store made for business reasons; the transaction was
/// rolled back cleanly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decline {
    InsufficientInventory { item_id: ItemId, requested: i32 },
}

impl fmt::Display for Decline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decline::InsufficientInventory { item_id, requested } => write!(
                f,
                "insufficient inventory for item {item_id} (requested {requested})"
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlacementOutcome {
    Placed(OrderId),
    Declined(Decline),
}

#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("Could not open a transaction: {0}")]
    Begin(#[source] StoreError),

    #[error("Order placement failed at '{step}' and was rolled back: {cause}")]
    Failed {
        step: Step,
        #[source]
        cause: FailureKind,
    },

    /// The store is in an unknown state: work done before the failure may
    /// or may not be visible.
    #[error("Rollback after '{step}' failed ({cause}); store state is unverified: {source}")]
    RollbackFailed {
        step: Step,
        cause: FailureKind,
        source: StoreError,
    },

    #[error("Auto-commit mode could not be restored: {source}")]
    AutoCommitRestore {
        /// The order that was committed before restoration failed, if any.
        placed: Option<OrderId>,
        source: StoreError,
    },
}

impl PlacementError {
    pub fn step(&self) -> Option<Step> {
        match self {
            PlacementError::Begin(_) => Some(Step::OpenTransaction),
            PlacementError::Failed { step, .. } | PlacementError::RollbackFailed { step, .. } => {
                Some(*step)
            }
            PlacementError::AutoCommitRestore { .. } => None,
        }
    }

    pub fn kind(&self) -> Option<&FailureKind> {
        match self {
            PlacementError::Failed { cause, .. } | PlacementError::RollbackFailed { cause, .. } => {
                Some(cause)
            }
            _ => None,
        }
    }
}

struct StepFailure {
    step: Step,
    cause: FailureKind,
}

impl StepFailure {
    fn new(step: Step, cause: impl Into<FailureKind>) -> Self {
        Self {
            step,
            cause: cause.into(),
        }
    }
}

/// Drives one placement over a borrowed session.
///
/// The workflow holds the session mutably for the whole call, so no other
/// statement can interleave with the transaction.
pub struct OrderPlacement<'s, S: ?Sized> {
    session: &'s mut S,
    state: PlacementState,
}

impl<'s, S> OrderPlacement<'s, S>
where
    S: TransactionControl + OrderStore + InventoryGuard + ?Sized,
{
    pub fn new(session: &'s mut S) -> Self {
        Self {
            session,
            state: PlacementState::Idle,
        }
    }

    pub fn state(&self) -> PlacementState {
        self.state
    }

    pub fn place(
        &mut self,
        request: &PlacementRequest,
    ) -> Result<PlacementOutcome, PlacementError> {
        let mut scope =
            TransactionScope::open(&mut *self.session).map_err(PlacementError::Begin)?;
        advance(&mut self.state, PlacementState::TransactionOpen);

        let attempt = run_steps(scope.session(), request, &mut self.state).and_then(|order_id| {
            scope
                .commit()
                .map(|()| order_id)
                .map_err(|e| StepFailure::new(Step::Commit, FailureKind::Commit(e)))
        });

        let settled = match attempt {
            Ok(order_id) => {
                advance(&mut self.state, PlacementState::Committed);
                log::info!(
                    "Placed order {} for customer {} ({} x item {})",
                    order_id,
                    request.customer_id(),
                    request.quantity(),
                    request.item_id()
                );
                Ok(PlacementOutcome::Placed(order_id))
            }
            Err(StepFailure { step, cause }) => match scope.rollback() {
                Ok(()) => {
                    advance(&mut self.state, PlacementState::RolledBack);
                    match cause {
                        FailureKind::InsufficientInventory { item_id, requested } => {
                            log::warn!(
                                "Order declined for customer {}: item {} short of {} units",
                                request.customer_id(),
                                item_id,
                                requested
                            );
                            Ok(PlacementOutcome::Declined(Decline::InsufficientInventory {
                                item_id,
                                requested,
                            }))
                        }
                        cause => {
                            log::warn!("Order placement rolled back at '{}': {}", step, cause);
                            Err(PlacementError::Failed { step, cause })
                        }
                    }
                }
                Err(source) => {
                    log::error!(
                        "Rollback failed after '{}' ({}); store state is unverified: {}",
                        step,
                        cause,
                        source
                    );
                    Err(PlacementError::RollbackFailed {
                        step,
                        cause,
                        source,
                    })
                }
            },
        };

        match scope.close() {
            Ok(()) => settled,
            Err(source) => {
                log::error!("Failed to restore auto-commit after order placement: {}", source);
                match settled {
                    Err(e @ PlacementError::RollbackFailed { .. }) => Err(e),
                    Ok(PlacementOutcome::Placed(order_id)) => {
                        Err(PlacementError::AutoCommitRestore {
                            placed: Some(order_id),
                            source,
                        })
                    }
                    _ => Err(PlacementError::AutoCommitRestore {
                        placed: None,
                        source,
                    }),
                }
            }
        }
    }
}

/// Places one order on `session`. See [`OrderPlacement`].
pub fn place_order<S>(
    session: &mut S,
    request: &PlacementRequest,
) -> Result<PlacementOutcome, PlacementError>
where
    S: TransactionControl + OrderStore + InventoryGuard + ?Sized,
{
    OrderPlacement::new(session).place(request)
}

fn advance(state: &mut PlacementState, next: PlacementState) {
    log::debug!("Order placement {:?} -> {:?}", state, next);
    *state = next;
}

fn run_steps<S>(
    session: &mut S,
    request: &PlacementRequest,
    state: &mut PlacementState,
) -> Result<OrderId, StepFailure>
where
    S: OrderStore + InventoryGuard + ?Sized,
{
    let item_id = request.item_id();
    let quantity = request.quantity();

    let order_id = match session.insert_order(request.customer_id()) {
        Ok(Some(order_id)) => order_id,
        Ok(None) => {
            return Err(StepFailure::new(
                Step::CreateOrder,
                FailureKind::OrderCreation("store returned no generated order id".to_string()),
            ))
        }
        Err(e) => {
            return Err(StepFailure::new(
                Step::CreateOrder,
                FailureKind::OrderCreation(e.to_string()),
            ))
        }
    };
    advance(state, PlacementState::OrderCreated);

    // Plain list price; discounts only apply to quotes from the price oracle.
    let unit_price = session
        .item_price(item_id)
        .map_err(|source| {
            StepFailure::new(Step::ResolvePrice, PriceLookupError::Store { item_id, source })
        })?
        .ok_or_else(|| {
            StepFailure::new(Step::ResolvePrice, FailureKind::ItemNotFound { item_id })
        })?;
    advance(state, PlacementState::PriceResolved);

    let line = OrderLineInput::priced(order_id, item_id, &unit_price, quantity);
    session
        .insert_order_line(&line)
        .map_err(|e| StepFailure::new(Step::RecordLine, FailureKind::LineRecording(e)))?;
    advance(state, PlacementState::LineRecorded);

    let reserved = session
        .try_reserve(item_id, quantity)
        .map_err(|e| StepFailure::new(Step::ReserveInventory, e))?;
    if !reserved {
        return Err(StepFailure::new(
            Step::ReserveInventory,
            FailureKind::InsufficientInventory {
                item_id,
                requested: quantity,
            },
        ));
    }
    advance(state, PlacementState::InventoryReserved);

    Ok(order_id)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use bigdecimal::BigDecimal;

    use super::*;
    use crate::domain::ports::Catalog;
    use crate::infrastructure::memory::InMemorySession;

    fn session_with_item(price: &str, stock: i32) -> (InMemorySession, ItemId) {
        let mut session = InMemorySession::new();
        let item_id = session.add_item("Oat Milk", BigDecimal::from_str(price).unwrap(), stock);
        session.add_customer(1, "Grace", "Hopper");
        (session, item_id)
    }

    fn request(item_id: ItemId, quantity: i32) -> PlacementRequest {
        PlacementRequest::new(1, item_id, quantity).expect("valid request")
    }

    #[test]
    fn places_order_and_commits_everything() {
        let (mut session, item_id) = session_with_item("9.99", 10);

        let mut placement = OrderPlacement::new(&mut session);
        let outcome = placement.place(&request(item_id, 3)).expect("placement failed");
        assert_eq!(placement.state(), PlacementState::Committed);

        let PlacementOutcome::Placed(order_id) = outcome else {
            panic!("expected a placed order, got {outcome:?}");
        };
        let lines = session.list_order_lines().unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].order_id, order_id);
        assert_eq!(lines[0].total, BigDecimal::from_str("29.97").unwrap());
        assert_eq!(session.list_orders().unwrap().len(), 1);
        assert_eq!(session.stock_of(item_id), Some(7));
        assert!(session.auto_commit());
    }

    #[test]
    fn insufficient_stock_is_declined_and_rolled_back() {
        let (mut session, item_id) = session_with_item("1.50", 2);

        let mut placement = OrderPlacement::new(&mut session);
        let outcome = placement.place(&request(item_id, 5)).expect("decline is not an error");
        assert_eq!(placement.state(), PlacementState::RolledBack);
        assert_eq!(
            outcome,
            PlacementOutcome::Declined(Decline::InsufficientInventory {
                item_id,
                requested: 5
            })
        );

        assert!(session.list_orders().unwrap().is_empty());
        assert!(session.list_order_lines().unwrap().is_empty());
        assert_eq!(session.stock_of(item_id), Some(2));
        assert!(session.auto_commit());
    }

    #[test]
    fn unknown_customer_fails_order_creation() {
        let (mut session, item_id) = session_with_item("1.00", 5);

        let stranger = PlacementRequest::new(42, item_id, 1).expect("valid request");
        let err = place_order(&mut session, &stranger).unwrap_err();
        assert_eq!(err.step(), Some(Step::CreateOrder));
        assert!(matches!(err.kind(), Some(FailureKind::OrderCreation(_))));
        assert!(session.list_orders().unwrap().is_empty());
        assert_eq!(session.stock_of(item_id), Some(5));
        assert!(session.auto_commit());
    }

    #[test]
    fn unknown_item_fails_at_price_resolution() {
        let (mut session, _) = session_with_item("1.00", 5);

        let err = place_order(&mut session, &request(999, 1)).unwrap_err();
        assert_eq!(err.step(), Some(Step::ResolvePrice));
        assert!(matches!(
            err.kind(),
            Some(FailureKind::ItemNotFound { item_id: 999 })
        ));
        assert!(session.list_orders().unwrap().is_empty());
        assert!(session.auto_commit());
    }

    #[test]
    fn missing_generated_id_fails_order_creation() {
        let (mut session, item_id) = session_with_item("1.00", 5);
        session.faults_mut().omit_order_id = true;

        let err = place_order(&mut session, &request(item_id, 1)).unwrap_err();
        assert_eq!(err.step(), Some(Step::CreateOrder));
        assert!(matches!(err.kind(), Some(FailureKind::OrderCreation(_))));
        assert!(session.list_orders().unwrap().is_empty());
        assert_eq!(session.stock_of(item_id), Some(5));
    }

    #[test]
    fn failing_order_insert_is_reported_as_order_creation() {
        let (mut session, item_id) = session_with_item("1.00", 5);
        session.faults_mut().fail_insert_order = true;

        let err = place_order(&mut session, &request(item_id, 1)).unwrap_err();
        assert!(matches!(err.kind(), Some(FailureKind::OrderCreation(_))));
        assert_eq!(session.rollbacks(), 1);
    }

    #[test]
    fn price_read_failure_is_a_price_lookup_error() {
        let (mut session, item_id) = session_with_item("1.00", 5);
        session.faults_mut().fail_price_read = true;

        let err = place_order(&mut session, &request(item_id, 1)).unwrap_err();
        assert!(matches!(
            err,
            PlacementError::Failed {
                step: Step::ResolvePrice,
                cause: FailureKind::PriceLookup(PriceLookupError::Store { .. }),
            }
        ));
        assert!(session.list_orders().unwrap().is_empty());
    }

    #[test]
    fn line_insert_failure_rolls_back_the_order() {
        let (mut session, item_id) = session_with_item("2.00", 5);
        session.faults_mut().fail_order_line = true;

        let err = place_order(&mut session, &request(item_id, 2)).unwrap_err();
        assert_eq!(err.step(), Some(Step::RecordLine));
        assert!(session.list_orders().unwrap().is_empty());
        assert_eq!(session.stock_of(item_id), Some(5));
    }

    #[test]
    fn procedure_failure_is_an_inventory_call_error() {
        let (mut session, item_id) = session_with_item("2.00", 5);
        session.faults_mut().fail_procedure = true;

        let err = place_order(&mut session, &request(item_id, 2)).unwrap_err();
        assert!(matches!(err.kind(), Some(FailureKind::InventoryCall(_))));
        assert!(session.list_order_lines().unwrap().is_empty());
        assert!(session.auto_commit());
    }

    #[test]
    fn begin_failure_touches_nothing() {
        let (mut session, item_id) = session_with_item("2.00", 5);
        session.faults_mut().fail_begin = true;

        let mut placement = OrderPlacement::new(&mut session);
        let err = placement.place(&request(item_id, 1)).unwrap_err();
        assert!(matches!(err, PlacementError::Begin(_)));
        assert_eq!(placement.state(), PlacementState::Idle);
        assert_eq!(session.rollbacks(), 0);
        assert!(session.auto_commit());
    }

    #[test]
    fn commit_failure_with_clean_rollback_reports_commit_step() {
        let (mut session, item_id) = session_with_item("2.00", 5);
        session.faults_mut().fail_commit = true;

        let mut placement = OrderPlacement::new(&mut session);
        let err = placement.place(&request(item_id, 1)).unwrap_err();
        assert_eq!(placement.state(), PlacementState::RolledBack);
        assert!(matches!(
            err,
            PlacementError::Failed {
                step: Step::Commit,
                cause: FailureKind::Commit(_),
            }
        ));
        assert!(session.list_orders().unwrap().is_empty());
        assert_eq!(session.stock_of(item_id), Some(5));
        assert!(session.auto_commit());
    }

    #[test]
    fn commit_then_rollback_failure_is_never_a_success() {
        let (mut session, item_id) = session_with_item("2.00", 5);
        session.faults_mut().fail_commit = true;
        session.faults_mut().fail_rollback = true;

        let mut placement = OrderPlacement::new(&mut session);
        let err = placement.place(&request(item_id, 1)).unwrap_err();
        assert_eq!(placement.state(), PlacementState::InventoryReserved);
        assert!(matches!(
            err,
            PlacementError::RollbackFailed {
                step: Step::Commit,
                ..
            }
        ));
        assert_eq!(session.rollbacks(), 1);
        assert!(session.auto_commit());
    }

    #[test]
    fn rollback_failure_on_decline_is_surfaced() {
        let (mut session, item_id) = session_with_item("2.00", 1);
        session.faults_mut().fail_rollback = true;

        let err = place_order(&mut session, &request(item_id, 4)).unwrap_err();
        assert!(matches!(
            err,
            PlacementError::RollbackFailed {
                cause: FailureKind::InsufficientInventory { .. },
                ..
            }
        ));
    }

    #[test]
    fn restore_failure_after_commit_names_the_placed_order() {
        let (mut session, item_id) = session_with_item("2.00", 5);
        session.faults_mut().fail_restore = true;

        let err = place_order(&mut session, &request(item_id, 1)).unwrap_err();
        let PlacementError::AutoCommitRestore { placed, .. } = err else {
            panic!("expected AutoCommitRestore, got {err:?}");
        };
        assert!(placed.is_some());
        assert_eq!(session.list_orders().unwrap().len(), 1);
    }

    #[test]
    fn rollback_failure_outranks_restore_failure() {
        let (mut session, item_id) = session_with_item("2.00", 5);
        session.faults_mut().fail_order_line = true;
        session.faults_mut().fail_rollback = true;
        session.faults_mut().fail_restore = true;

        let err = place_order(&mut session, &request(item_id, 1)).unwrap_err();
        assert!(matches!(err, PlacementError::RollbackFailed { .. }));
    }

    #[test]
    fn manual_commit_mode_is_preserved() {
        let (mut session, item_id) = session_with_item("2.00", 5);
        session.set_auto_commit(false).unwrap();

        place_order(&mut session, &request(item_id, 1)).expect("placement failed");
        assert!(!session.auto_commit());
    }

    #[test]
    fn error_messages_name_the_step() {
        let (mut session, _) = session_with_item("2.00", 5);
        let err = place_order(&mut session, &request(404, 1)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Order placement failed at 'resolve price' and was rolled back: Item 404 not found"
        );
    }
}
