use crate::domain::errors::StoreError;
use crate::domain::ports::TransactionControl;

/// Transaction mode held on a session for the duration of one unit of work.
///
/// Opening the scope records the session's auto-commit flag and switches it
/// off. [`TransactionScope::close`] puts the recorded value back and reports
/// whether that worked. A scope dropped without being closed (early return,
/// panic) rolls back whatever is still pending before restoring the flag, so
/// unfinished work is never published. Failures on that path are logged.
pub struct TransactionScope<'s, S: TransactionControl + ?Sized> {
    session: &'s mut S,
    prior_auto_commit: bool,
    restored: bool,
}

impl<'s, S: TransactionControl + ?Sized> TransactionScope<'s, S> {
    pub fn open(session: &'s mut S) -> Result<Self, StoreError> {
        let prior_auto_commit = session.auto_commit();
        session.set_auto_commit(false)?;
        Ok(Self {
            session,
            prior_auto_commit,
            restored: false,
        })
    }

    pub fn session(&mut self) -> &mut S {
        &mut *self.session
    }

    pub fn commit(&mut self) -> Result<(), StoreError> {
        self.session.commit()
    }

    pub fn rollback(&mut self) -> Result<(), StoreError> {
        self.session.rollback()
    }

    pub fn close(mut self) -> Result<(), StoreError> {
        self.restored = true;
        self.session.set_auto_commit(self.prior_auto_commit)
    }
}

impl<S: TransactionControl + ?Sized> Drop for TransactionScope<'_, S> {
    fn drop(&mut self) {
        if self.restored {
            return;
        }
        // Restoring auto-commit would commit pending statements.
        if let Err(e) = self.session.rollback() {
            log::error!("Failed to roll back unclosed transaction scope: {}", e);
        }
        if let Err(e) = self.session.set_auto_commit(self.prior_auto_commit) {
            log::error!(
                "Failed to restore auto-commit={} on scope drop: {}",
                self.prior_auto_commit,
                e
            );
        }
    }
}
