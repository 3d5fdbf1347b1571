use crate::{
    app::{
        blob_storage::BlobStorage,
        gateway::{
            LoadSource,
            StorageGateway,
        },
    },
    entry::{
        BetEntry,
        BetType,
        Clock,
    },
    submission::{
        BetForm,
        ValidationError,
        create_entries,
    },
    summary::{
        BetSummary,
        CustomerSummary,
        NumberSummary,
        build_bet_summary,
        build_customer_summaries,
        build_number_summaries,
        leaders,
    },
};
use thiserror::Error;

pub mod blob_storage;
pub mod gateway;
pub mod in_memory_blob_storage;
pub mod sled_storage;
pub mod unavailable_storage;


#[derive(Debug, Error)]
pub enum SubmitError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

/// What a successful submission recorded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub customer_name: String,
    pub entries: Vec<BetEntry>,
    pub total_amount: u128,
}

/// One open session on the ledger: the last loaded entry list plus the
/// storage it came from.
pub struct App<Storage, Time> {
    gateway: StorageGateway<Storage>,
    clock: Time,
    entries: Vec<BetEntry>,
    source: Option<LoadSource>,
}

impl<Storage, Time> App<Storage, Time> {
    pub fn new(gateway: StorageGateway<Storage>, clock: Time) -> Self {
        Self {
            gateway,
            clock,
            entries: Vec::new(),
            source: None,
        }
    }

    pub fn entries(&self) -> &[BetEntry] {
        &self.entries
    }

    /// Key and schema the current entries were read from.
    pub fn source(&self) -> Option<&LoadSource> {
        self.source.as_ref()
    }

    pub fn summary(&self) -> BetSummary {
        build_bet_summary(&self.entries)
    }

    pub fn number_summaries(&self) -> Vec<NumberSummary> {
        build_number_summaries(&self.entries)
    }

    pub fn leaders(&self, bet_type: BetType, limit: usize) -> Vec<NumberSummary> {
        leaders(&self.number_summaries(), bet_type, limit)
    }

    pub fn customers(&self) -> Vec<CustomerSummary> {
        build_customer_summaries(&self.entries)
    }
}

impl<Storage: BlobStorage, Time: Clock> App<Storage, Time> {
    /// Re-reads the store. Call on start-up and on every change or focus
    /// signal; the last writer wins, nothing is merged.
    pub fn reload(&mut self) -> &[BetEntry] {
        let loaded = self.gateway.load_with_source(&self.clock);
        self.entries = loaded.entries;
        self.source = loaded.source;
        &self.entries
    }

    /// Validates the form, puts the new entries in front of the current list
    /// and saves. On any error the session is left exactly as it was.
    pub fn submit(&mut self, form: &BetForm) -> Result<Receipt, SubmitError> {
        let created = create_entries(form, &self.clock)?;
        let mut updated = Vec::with_capacity(created.len() + self.entries.len());
        updated.extend(created.iter().cloned());
        updated.extend(self.entries.iter().cloned());
        self.gateway.save(&updated)?;
        self.entries = updated;

        let customer_name = created
            .first()
            .map(|entry| entry.customer_name.clone())
            .unwrap_or_default();
        let total_amount = created.iter().map(|entry| u128::from(entry.amount)).sum();
        tracing::info!(
            "recorded {} bets for {customer_name} totalling {total_amount}",
            created.len()
        );
        Ok(Receipt {
            customer_name,
            entries: created,
            total_amount,
        })
    }
}
