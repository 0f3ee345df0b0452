//! Budget view model
//!
//! Loads budget rows from the content provider, decodes them into `Budget`
//! values and publishes them. Deletes and amount updates are started in the
//! background; their outcome only reaches the diagnostic sink.

use std::sync::Arc;

use tracing::{debug, error};

use super::live_data::LiveData;
use crate::diagnostics::ErrorReporter;
use crate::error::EnvelopeError;
use crate::models::{Budget, CurrencyContext, Money, HOME_AGGREGATE_ID};
use crate::provider::contract::{
    budgets_uri, KEY_ACCOUNTID, KEY_BUDGET, KEY_CODE, KEY_COLOR, KEY_CURRENCY, KEY_DESCRIPTION,
    KEY_GROUPING, KEY_ROWID, KEY_TITLE, TABLE_ACCOUNTS, TABLE_BUDGETS, TABLE_CURRENCIES,
};
use crate::provider::{
    map_to_list, map_to_one, AsyncWriteHandler, ContentResolver, ContentValues, Flow, Query,
    QueryObservable, Selection, Subscription, WriteTicket,
};

const WRITE_TOKEN: i32 = 0;

/// Qualify a column with the budgets table
fn q(column: &str) -> String {
    format!("{}.{}", TABLE_BUDGETS, column)
}

/// Columns of a budget row
///
/// A budget without an account is attributed to the aggregate of its
/// currency (the negated currency row id), falling back to the home
/// aggregate. The budget's own currency wins over the account's.
pub fn budget_projection() -> Vec<String> {
    vec![
        q(KEY_ROWID),
        format!(
            "coalesce({0}, -(select {1} from {2} where {3} = {4}), {5}) AS {0}",
            KEY_ACCOUNTID,
            KEY_ROWID,
            TABLE_CURRENCIES,
            KEY_CODE,
            q(KEY_CURRENCY),
            HOME_AGGREGATE_ID
        ),
        KEY_TITLE.to_string(),
        q(KEY_DESCRIPTION),
        format!(
            "coalesce({0}.{1}, {2}.{1}) AS {1}",
            TABLE_BUDGETS, KEY_CURRENCY, TABLE_ACCOUNTS
        ),
        KEY_BUDGET.to_string(),
        q(KEY_GROUPING),
        KEY_COLOR.to_string(),
    ]
}

/// Publishes a failed load instead of dropping it
#[derive(Clone)]
struct FailureSink {
    reporter: Arc<dyn ErrorReporter>,
    failure: LiveData<EnvelopeError>,
}

impl FailureSink {
    fn fail(&self, e: EnvelopeError) {
        error!(error = %e, "budget query failed");
        self.reporter.report(&e);
        self.failure.post_value(e);
    }
}

pub struct BudgetViewModel {
    resolver: ContentResolver,
    writer: AsyncWriteHandler,
    currencies: Arc<dyn CurrencyContext>,
    reporter: Arc<dyn ErrorReporter>,
    data: LiveData<Vec<Budget>>,
    budget: LiveData<Budget>,
    failure: LiveData<EnvelopeError>,
    disposable: Option<Subscription>,
}

impl BudgetViewModel {
    pub fn new(
        resolver: ContentResolver,
        currencies: Arc<dyn CurrencyContext>,
        reporter: Arc<dyn ErrorReporter>,
    ) -> Self {
        Self {
            writer: AsyncWriteHandler::new(resolver.clone()),
            resolver,
            currencies,
            reporter,
            data: LiveData::new(),
            budget: LiveData::new(),
            failure: LiveData::new(),
            disposable: None,
        }
    }

    /// All budgets, republished on every change
    pub fn data(&self) -> &LiveData<Vec<Budget>> {
        &self.data
    }

    /// The budget requested by [`BudgetViewModel::load_budget`]
    pub fn budget(&self) -> &LiveData<Budget> {
        &self.budget
    }

    /// Loads that ended because a row could not be read or the store failed
    pub fn failure(&self) -> &LiveData<EnvelopeError> {
        &self.failure
    }

    fn failure_sink(&self) -> FailureSink {
        FailureSink {
            reporter: self.reporter.clone(),
            failure: self.failure.clone(),
        }
    }

    fn create_query(&self, selection: Option<Selection>) -> QueryObservable {
        let mut query = Query::new(budgets_uri()).projection(budget_projection());
        if let Some(selection) = selection {
            query = query.selection(selection);
        }
        self.resolver.create_query(query, true)
    }

    /// Replace the running load; the previous one is cancelled
    fn set_disposable(&mut self, subscription: Subscription) {
        if let Some(previous) = self.disposable.replace(subscription) {
            previous.dispose();
        }
    }

    /// Load every budget and keep the list current
    pub fn load_all_budgets(&mut self) {
        let currencies = self.currencies.clone();
        let data = self.data.clone();
        let sink = self.failure_sink();

        let subscription = self.create_query(None).subscribe(move |result| {
            match result.and_then(|rows| {
                map_to_list(&rows, |row| Budget::from_row(row, currencies.as_ref()))
            }) {
                Ok(budgets) => {
                    debug!(count = budgets.len(), "budgets loaded");
                    data.post_value(budgets);
                    Flow::Continue
                }
                Err(e) => {
                    sink.fail(e);
                    Flow::Stop
                }
            }
        });
        self.set_disposable(subscription);
    }

    /// Load one budget; with `once` the load ends after the first emission
    pub fn load_budget(&mut self, budget_id: i64, once: bool) {
        let currencies = self.currencies.clone();
        let budget = self.budget.clone();
        let sink = self.failure_sink();

        let selection = Selection::eq(&q(KEY_ROWID), budget_id);
        let subscription = self.create_query(Some(selection)).subscribe(move |result| {
            match result.and_then(|rows| {
                map_to_one(&rows, |row| Budget::from_row(row, currencies.as_ref()))
            }) {
                Ok(Some(loaded)) => {
                    budget.post_value(loaded);
                    if once {
                        Flow::Stop
                    } else {
                        Flow::Continue
                    }
                }
                Ok(None) => {
                    debug!(budget_id, "budget not present");
                    Flow::Continue
                }
                Err(e) => {
                    sink.fail(e);
                    Flow::Stop
                }
            }
        });
        self.set_disposable(subscription);
    }

    /// Delete budgets in the background
    ///
    /// A store that fails, or removes a different number of rows than
    /// requested, is reported to the diagnostic sink; the caller is not told.
    pub fn delete_budgets(&self, budget_ids: &[i64]) -> WriteTicket {
        if budget_ids.is_empty() {
            return self.writer.completed(WRITE_TOKEN, 0);
        }
        let requested = budget_ids.len();
        let reporter = self.reporter.clone();

        self.writer.start_delete(
            WRITE_TOKEN,
            budgets_uri(),
            Some(Selection::in_ids(KEY_ROWID, budget_ids)),
            Some(Box::new(move |_token, result| match result {
                Ok(deleted) if *deleted != requested => {
                    reporter.report(&EnvelopeError::Inconsistency(format!(
                        "Budget delete failed {}/{}",
                        deleted, requested
                    )));
                }
                Ok(_) => {}
                Err(e) => reporter.report(e),
            })),
        )
    }

    /// Store a new amount for a budget, or for one of its categories when
    /// `category_id` is not 0
    pub fn update_budget(&self, budget_id: i64, category_id: i64, amount: &Money) -> WriteTicket {
        let budget_uri = budgets_uri().with_appended_id(budget_id);
        let uri = if category_id == 0 {
            budget_uri
        } else {
            budget_uri.with_appended_id(category_id)
        };
        let values = ContentValues::new().with(KEY_BUDGET, amount.amount_minor());
        self.writer
            .start_update(WRITE_TOKEN, uri, values, None, None)
    }

    /// Cancel the running load
    pub fn clear(&mut self) {
        if let Some(subscription) = self.disposable.take() {
            subscription.dispose();
        }
    }
}

impl Drop for BudgetViewModel {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostics::RecordingReporter;
    use crate::models::{CurrencyUnit, Grouping, StaticCurrencyContext};
    use crate::provider::testing::{next_value, FakeProvider};
    use crate::provider::{Row, Value};
    use std::time::Duration;

    fn budget_row(id: i64, currency: &str) -> Row {
        Row::new()
            .with(KEY_ROWID, id)
            .with(KEY_ACCOUNTID, id * 10)
            .with(KEY_TITLE, format!("Budget {}", id))
            .with(KEY_DESCRIPTION, Option::<String>::None)
            .with(KEY_CURRENCY, currency)
            .with(KEY_BUDGET, id * 1000)
            .with(KEY_GROUPING, "MONTH")
            .with(KEY_COLOR, 0xff0000i32)
    }

    struct Fixture {
        provider: Arc<FakeProvider>,
        reporter: Arc<RecordingReporter>,
        resolver: ContentResolver,
        view_model: BudgetViewModel,
    }

    fn fixture() -> Fixture {
        let provider = Arc::new(FakeProvider::new());
        let reporter = Arc::new(RecordingReporter::new());
        let resolver = ContentResolver::with_current_runtime(provider.clone()).unwrap();
        let view_model = BudgetViewModel::new(
            resolver.clone(),
            Arc::new(StaticCurrencyContext::new()),
            reporter.clone(),
        );
        Fixture {
            provider,
            reporter,
            resolver,
            view_model,
        }
    }

    #[tokio::test]
    async fn test_load_all_budgets() {
        let mut f = fixture();
        f.provider.set_rows(
            &budgets_uri(),
            vec![
                budget_row(1, "USD"),
                budget_row(2, "EUR"),
                budget_row(3, "JPY"),
            ],
        );
        let mut rx = f.view_model.data().observe();

        f.view_model.load_all_budgets();
        let budgets = next_value(&mut rx).await;

        assert_eq!(budgets.len(), 3);
        assert_eq!(budgets[1].amount.currency().code, "EUR");
        assert_eq!(budgets[2].amount.currency().fraction_digits, 0);
        assert_eq!(budgets[0].grouping, Grouping::Month);

        let query = &f.provider.queries()[0];
        assert_eq!(query.uri, budgets_uri());
        assert_eq!(query.selection, None);
        assert_eq!(query.sort_order, None);
    }

    #[test]
    fn test_projection_resolves_currency_and_account() {
        let projection = budget_projection();
        assert_eq!(projection[0], "budgets._id");
        assert_eq!(
            projection[1],
            "coalesce(account_id, -(select _id from currency where code = budgets.currency), -2147483648) AS account_id"
        );
        assert_eq!(
            projection[4],
            "coalesce(budgets.currency, accounts.currency) AS currency"
        );
    }

    #[tokio::test]
    async fn test_load_all_republishes_on_change() {
        let mut f = fixture();
        f.provider.set_rows(&budgets_uri(), vec![budget_row(1, "USD")]);
        let mut rx = f.view_model.data().observe();
        f.view_model.load_all_budgets();
        assert_eq!(next_value(&mut rx).await.len(), 1);

        f.provider.set_rows(
            &budgets_uri(),
            vec![budget_row(1, "USD"), budget_row(2, "USD")],
        );
        f.resolver.notify_change(&budgets_uri());
        assert_eq!(next_value(&mut rx).await.len(), 2);
    }

    #[tokio::test]
    async fn test_malformed_row_fails_the_load() {
        let mut f = fixture();
        let bad = budget_row(2, "USD").with(KEY_GROUPING, "FORTNIGHT");
        f.provider
            .set_rows(&budgets_uri(), vec![budget_row(1, "USD"), bad]);
        let mut failures = f.view_model.failure().observe();

        f.view_model.load_all_budgets();
        let failure = next_value(&mut failures).await;

        assert!(failure.is_mapping());
        assert!(!f.view_model.data().has_value());
        assert_eq!(f.reporter.reports(), vec![failure]);
    }

    #[tokio::test]
    async fn test_load_budget_once() {
        let mut f = fixture();
        f.provider.set_rows(&budgets_uri(), vec![budget_row(4, "GBP")]);
        let mut rx = f.view_model.budget().observe();

        f.view_model.load_budget(4, true);
        let budget = next_value(&mut rx).await;
        assert_eq!(budget.id, 4);

        let query = &f.provider.queries()[0];
        let selection = query.selection.as_ref().unwrap();
        assert_eq!(selection.clause, "budgets._id = ?");
        assert_eq!(selection.args, ["4"]);

        f.resolver.notify_change(&budgets_uri());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(f.provider.queries().len(), 1);
    }

    #[tokio::test]
    async fn test_load_budget_live() {
        let mut f = fixture();
        f.provider.set_rows(&budgets_uri(), vec![budget_row(4, "GBP")]);
        let mut rx = f.view_model.budget().observe();
        f.view_model.load_budget(4, false);
        next_value(&mut rx).await;

        let renamed = budget_row(4, "GBP").with(KEY_TITLE, "Holidays");
        f.provider.set_rows(&budgets_uri(), vec![renamed]);
        f.resolver.notify_change(&budgets_uri().with_appended_id(4));
        assert_eq!(next_value(&mut rx).await.title, "Holidays");
    }

    #[tokio::test]
    async fn test_new_load_replaces_previous() {
        let mut f = fixture();
        f.provider.set_rows(&budgets_uri(), vec![budget_row(1, "USD")]);
        let mut rx = f.view_model.data().observe();
        f.view_model.load_all_budgets();
        next_value(&mut rx).await;

        let mut single = f.view_model.budget().observe();
        f.view_model.load_budget(1, false);
        next_value(&mut single).await;

        f.resolver.notify_change(&budgets_uri());
        next_value(&mut single).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
        // One list load, two single loads; the list load no longer runs
        assert_eq!(f.provider.queries().len(), 3);
    }

    #[tokio::test]
    async fn test_delete_count_mismatch_is_reported() {
        let f = fixture();
        f.provider.set_delete_count(2);

        f.view_model.delete_budgets(&[1, 2, 3]).completed().await;

        let (uri, selection) = &f.provider.deletes()[0];
        assert_eq!(*uri, budgets_uri());
        assert_eq!(selection.as_ref().unwrap().clause, "_id IN (?,?,?)");
        assert_eq!(
            f.reporter.reports(),
            vec![EnvelopeError::Inconsistency("Budget delete failed 2/3".into())]
        );
    }

    #[tokio::test]
    async fn test_delete_matching_count_is_silent() {
        let f = fixture();
        f.view_model.delete_budgets(&[1, 2]).completed().await;
        assert!(f.reporter.reports().is_empty());

        f.view_model.delete_budgets(&[]).completed().await;
        assert_eq!(f.provider.deletes().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_store_failure_is_reported() {
        let f = fixture();
        f.provider
            .fail_writes(EnvelopeError::Storage("read-only".into()));

        f.view_model.delete_budgets(&[1, 2, 3]).completed().await;

        assert_eq!(
            f.reporter.reports(),
            vec![EnvelopeError::Storage("read-only".into())]
        );
    }

    #[tokio::test]
    async fn test_update_budget_addresses_budget_or_category() {
        let f = fixture();
        let amount = Money::new(CurrencyUnit::new("USD", "$", 2), 12_345);

        f.view_model.update_budget(4, 0, &amount).completed().await;
        f.view_model.update_budget(4, 9, &amount).completed().await;

        let updates = f.provider.updates();
        assert_eq!(updates[0].0, budgets_uri().with_appended_id(4));
        assert_eq!(
            updates[1].0,
            budgets_uri().with_appended_id(4).with_appended_id(9)
        );
        assert_eq!(updates[0].1.get(KEY_BUDGET), Some(&Value::Integer(12_345)));
    }
}
