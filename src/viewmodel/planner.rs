//! Planner view model
//!
//! Shows plan instances from the planner calendar over a window of months
//! that starts as the current and the following month and grows one month
//! at a time in either direction. Each load publishes only the slice it
//! fetched; observers accumulate.

use std::fmt;

use chrono::format::{Item, StrftimeItems};
use chrono::{Local, NaiveDate, TimeZone};
use tracing::{debug, error};

use super::live_data::LiveData;
use crate::error::{EnvelopeError, EnvelopeResult};
use crate::models::{Month, PlanInstance, PlanInstanceUpdate};
use crate::provider::contract::{instances_uri, KEY_BEGIN, KEY_CALENDAR_ID};
use crate::provider::{
    map_to_list_lenient, map_to_one_or_default, CompositeSubscription, ContentResolver,
    ContentUri, Flow, Query, Selection, Subscription,
};

/// Which end of the window to extend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadDirection {
    Earlier,
    Later,
}

/// One piece of the planner title; pieces with an action extend the window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleSegment {
    pub text: String,
    pub action: Option<LoadDirection>,
}

/// Title naming the window boundaries
///
/// The start label extends the window to earlier months, the end label to
/// later ones. Binding those to gestures is up to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannerTitle {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub start_label: String,
    pub end_label: String,
}

const TITLE_SEPARATOR: &str = " - ";

impl PlannerTitle {
    fn new(first: Month, last: Month, date_format: &str) -> Self {
        let start = first.start_date();
        let end = last.start_date();
        Self {
            start,
            end,
            start_label: start.format(date_format).to_string(),
            end_label: end.format(date_format).to_string(),
        }
    }

    pub fn segments(&self) -> Vec<TitleSegment> {
        vec![
            TitleSegment {
                text: self.start_label.clone(),
                action: Some(LoadDirection::Earlier),
            },
            TitleSegment {
                text: TITLE_SEPARATOR.to_string(),
                action: None,
            },
            TitleSegment {
                text: self.end_label.clone(),
                action: Some(LoadDirection::Later),
            },
        ]
    }

    /// The action under a character offset of the rendered title
    pub fn action_at(&self, offset: usize) -> Option<LoadDirection> {
        let mut end = 0;
        for segment in self.segments() {
            end += segment.text.chars().count();
            if offset < end {
                return segment.action;
            }
        }
        None
    }
}

impl fmt::Display for PlannerTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.start_label, TITLE_SEPARATOR, self.end_label)
    }
}

/// Reject strftime patterns chrono cannot render
fn validate_date_format(date_format: &str) -> EnvelopeResult<()> {
    if StrftimeItems::new(date_format).any(|item| matches!(item, Item::Error)) {
        return Err(EnvelopeError::Validation(format!(
            "Invalid date format: {}",
            date_format
        )));
    }
    Ok(())
}

pub struct PlannerViewModel<Tz: TimeZone = Local>
where
    Tz: Send + Sync + 'static,
    Tz::Offset: Send + Sync,
{
    resolver: ContentResolver,
    planner_calendar_id: i64,
    date_format: String,
    zone: Tz,
    first: Month,
    last: Month,
    instances: LiveData<(bool, Vec<PlanInstance>)>,
    title: LiveData<PlannerTitle>,
    updates: LiveData<PlanInstanceUpdate>,
    disposable: Option<Subscription>,
    update_disposables: CompositeSubscription,
}

impl PlannerViewModel<Local> {
    /// A planner over the current and the following month, in local time
    pub fn new(
        resolver: ContentResolver,
        planner_calendar_id: i64,
        date_format: &str,
    ) -> EnvelopeResult<Self> {
        Self::with_zone(resolver, planner_calendar_id, date_format, Month::current(), Local)
    }
}

impl<Tz> PlannerViewModel<Tz>
where
    Tz: TimeZone + Send + Sync + 'static,
    Tz::Offset: Send + Sync,
{
    /// A planner over `anchor` and the month after it, in `zone`
    pub fn with_zone(
        resolver: ContentResolver,
        planner_calendar_id: i64,
        date_format: &str,
        anchor: Month,
        zone: Tz,
    ) -> EnvelopeResult<Self> {
        validate_date_format(date_format)?;
        Ok(Self {
            resolver,
            planner_calendar_id,
            date_format: date_format.to_string(),
            zone,
            first: anchor,
            last: anchor.next(),
            instances: LiveData::new(),
            title: LiveData::new(),
            updates: LiveData::new(),
            disposable: None,
            update_disposables: CompositeSubscription::new(),
        })
    }

    /// Whether the last load extended the window forward, and what it found
    pub fn instances(&self) -> &LiveData<(bool, Vec<PlanInstance>)> {
        &self.instances
    }

    pub fn title(&self) -> &LiveData<PlannerTitle> {
        &self.title
    }

    pub fn updates(&self) -> &LiveData<PlanInstanceUpdate> {
        &self.updates
    }

    /// First and last month of the window
    pub fn window(&self) -> (Month, Month) {
        (self.first, self.last)
    }

    /// Number of update lookups still running
    pub fn pending_updates(&self) -> usize {
        self.update_disposables.active()
    }

    /// Load instances
    ///
    /// Without a direction the whole window is queried. Otherwise the window
    /// grows by one month in that direction and only the new month is
    /// queried.
    pub fn load_instances(&mut self, direction: Option<LoadDirection>) {
        let (start, end) = match direction {
            None => (self.first, self.last),
            Some(LoadDirection::Later) => {
                self.last = self.last.next();
                (self.last, self.last)
            }
            Some(LoadDirection::Earlier) => {
                self.first = self.first.prev();
                (self.first, self.first)
            }
        };

        let uri = instances_uri()
            .with_appended_id(start.start_millis_in(&self.zone))
            .with_appended_id(end.end_millis_in(&self.zone));
        let query = Query::new(uri)
            .selection(Selection::raw(format!(
                "{} = {}",
                KEY_CALENDAR_ID, self.planner_calendar_id
            )))
            .sort_order(format!("{} ASC", KEY_BEGIN));

        let later = direction == Some(LoadDirection::Later);
        let title = PlannerTitle::new(self.first, self.last, &self.date_format);
        let zone = self.zone.clone();
        let instances = self.instances.clone();
        let title_slot = self.title.clone();

        let subscription = self
            .resolver
            .create_query(query, false)
            .subscribe(move |result| {
                match result {
                    Ok(rows) => {
                        let decoded =
                            map_to_list_lenient(&rows, |row| PlanInstance::from_event_row(row, &zone));
                        let dropped = rows.len() - decoded.len();
                        if dropped > 0 {
                            debug!(dropped, "skipped plan instance rows");
                        }
                        title_slot.post_value(title.clone());
                        instances.post_value((later, decoded));
                    }
                    Err(e) => error!(error = %e, "plan instance query failed"),
                }
                Flow::Stop
            });
        if let Some(previous) = self.disposable.replace(subscription) {
            previous.dispose();
        }
    }

    /// Extend the window; what activating a title segment does
    pub fn extend(&mut self, direction: LoadDirection) {
        self.load_instances(Some(direction));
    }

    /// Look up the realized state of one plan instance
    ///
    /// `uri` carries the template id and the instance id as its second and
    /// third path segments. Without a status row the instance is open.
    pub fn get_update_for(&mut self, uri: &ContentUri) -> EnvelopeResult<()> {
        let template_id = uri.segment_id(1)?;
        let instance_id = uri.segment_id(2)?;
        let updates = self.updates.clone();

        let subscription = self
            .resolver
            .create_query(Query::new(uri.clone()), false)
            .subscribe(move |result| {
                let update = result.and_then(|rows| {
                    map_to_one_or_default(
                        &rows,
                        |row| PlanInstanceUpdate::from_row(template_id, instance_id, row),
                        PlanInstanceUpdate::open(template_id, instance_id),
                    )
                });
                match update {
                    Ok(update) => updates.post_value(update),
                    Err(e) => error!(template_id, instance_id, error = %e, "plan instance lookup failed"),
                }
                Flow::Stop
            });
        self.update_disposables.add(subscription);
        Ok(())
    }

    /// Cancel the running load and every pending update lookup
    pub fn clear(&mut self) {
        if let Some(subscription) = self.disposable.take() {
            subscription.dispose();
        }
        self.update_disposables.dispose();
    }
}

impl<Tz> Drop for PlannerViewModel<Tz>
where
    Tz: TimeZone + Send + Sync + 'static,
    Tz::Offset: Send + Sync,
{
    fn drop(&mut self) {
        self.clear();
    }
}
