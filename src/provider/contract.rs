//! Table, column and uri names shared with the content provider

use super::uri::ContentUri;

pub const AUTHORITY: &str = "envelope.planner";
pub const CALENDAR_AUTHORITY: &str = "envelope.planner.calendar";

pub const TABLE_BUDGETS: &str = "budgets";
pub const TABLE_ACCOUNTS: &str = "accounts";
pub const TABLE_CURRENCIES: &str = "currency";

pub const KEY_ROWID: &str = "_id";
pub const KEY_ACCOUNTID: &str = "account_id";
pub const KEY_TITLE: &str = "title";
pub const KEY_DESCRIPTION: &str = "description";
pub const KEY_CURRENCY: &str = "currency";
pub const KEY_CODE: &str = "code";
pub const KEY_BUDGET: &str = "budget";
pub const KEY_GROUPING: &str = "grouping";
pub const KEY_COLOR: &str = "color";
pub const KEY_AMOUNT: &str = "amount";
pub const KEY_TRANSACTIONID: &str = "transaction_id";
pub const KEY_TEMPLATEID: &str = "template_id";
pub const KEY_INSTANCE_STATUS: &str = "status";

// Calendar instance columns
pub const KEY_EVENT_ID: &str = "event_id";
pub const KEY_BEGIN: &str = "begin";
pub const KEY_CALENDAR_ID: &str = "calendar_id";

/// `content://envelope.planner/budgets`
pub fn budgets_uri() -> ContentUri {
    ContentUri::new(AUTHORITY, &[TABLE_BUDGETS])
}

/// Calendar instances; append the range start and end millis as ids
pub fn instances_uri() -> ContentUri {
    ContentUri::new(CALENDAR_AUTHORITY, &["instances", "when"])
}

/// Link between plan instances and the transactions they produced
pub fn plan_instance_status_uri() -> ContentUri {
    ContentUri::new(AUTHORITY, &["planinstance_transaction"])
}

/// Status of one instance: `.../planinstance_transaction/<template>/<instance>`
pub fn plan_instance_uri(template_id: i64, instance_id: i64) -> ContentUri {
    plan_instance_status_uri()
        .with_appended_id(template_id)
        .with_appended_id(instance_id)
}
