/// Task query engine
///
/// Turns the raw, optional query parameters of a list request into a
/// validated [`TaskQuery`] and applies the requested ordering to the
/// owner's result set. The validation rules are deliberately uneven and
/// must stay that way:
///
/// - `due_before` / `due_after` must parse as ISO calendar dates
///   (`YYYY-MM-DD`); anything else is rejected. Both bounds are inclusive
///   and may be combined.
/// - `status` must be the literal string "true" or "false"
///   (case-insensitive); anything else is rejected.
/// - `priority` outside {High, Medium, Low} is silently ignored: the
///   filter is simply not applied. Strict dates, lenient priority.
/// - `sort_by` must be one of {due_date, priority}; `order` one of
///   {asc, desc}; both are rejected otherwise.
///
/// # Ordering
///
/// Priority has a fixed rank (High=1, Medium=2, Low=3). Sorting by
/// priority orders solely by that rank. Sorting by due date orders by the
/// date and breaks ties by ascending rank, even when the primary order is
/// descending.
///
/// # Example
///
/// ```
/// use tasknest_shared::query::{TaskQuery, TaskQueryParams};
///
/// let params = TaskQueryParams {
///     due_before: Some("2024-06-30".to_string()),
///     status: Some("TRUE".to_string()),
///     ..Default::default()
/// };
///
/// let query = TaskQuery::parse(&params).unwrap();
/// assert_eq!(query.status, Some(true));
/// ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::models::task::{Priority, Task};

/// Error type for query-parameter validation
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// A date filter failed to parse as `YYYY-MM-DD`
    #[error("Invalid date format. Use YYYY-MM-DD.")]
    InvalidDate {
        /// Which filter carried the bad value
        field: &'static str,
    },

    /// Status filter was neither "true" nor "false"
    #[error("Status must be 'true' or 'false'")]
    InvalidStatus,

    /// Unknown sort field
    #[error("Invalid sort_by value")]
    InvalidSortBy,

    /// Unknown sort direction
    #[error("Invalid order value")]
    InvalidOrder,
}

impl QueryError {
    /// The request field the error refers to
    pub fn field(&self) -> &'static str {
        match self {
            QueryError::InvalidDate { field } => field,
            QueryError::InvalidStatus => "status",
            QueryError::InvalidSortBy => "sort_by",
            QueryError::InvalidOrder => "order",
        }
    }
}

/// Sort field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    DueDate,
    Priority,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Applies the direction to a primary-key comparison
    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    }
}

/// Raw, unvalidated query parameters as they arrive on the request
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskQueryParams {
    pub due_before: Option<String>,
    pub due_after: Option<String>,
    pub priority: Option<String>,
    pub status: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
}

/// Validated task list query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    /// Inclusive upper bound on due date
    pub due_before: Option<NaiveDate>,

    /// Inclusive lower bound on due date
    pub due_after: Option<NaiveDate>,

    /// Priority filter; None when absent or unrecognized
    pub priority: Option<Priority>,

    /// Completion filter
    pub status: Option<bool>,

    /// Sort field (defaults to due date)
    pub sort_by: SortBy,

    /// Sort direction (defaults to ascending)
    pub order: SortOrder,
}

impl TaskQuery {
    /// Validates raw parameters into a query
    ///
    /// # Errors
    ///
    /// Returns the first violation encountered, checked in request order:
    /// dates, then status, then sort_by, then order. An unrecognized
    /// priority is not a violation; the filter is dropped.
    pub fn parse(params: &TaskQueryParams) -> Result<Self, QueryError> {
        let due_before = params
            .due_before
            .as_deref()
            .map(|s| parse_date(s, "due_before"))
            .transpose()?;

        let due_after = params
            .due_after
            .as_deref()
            .map(|s| parse_date(s, "due_after"))
            .transpose()?;

        let priority = params.priority.as_deref().and_then(Priority::parse);

        let status = match params.status.as_deref() {
            None => None,
            Some(s) => match s.to_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => return Err(QueryError::InvalidStatus),
            },
        };

        let sort_by = match params.sort_by.as_deref() {
            None => SortBy::DueDate,
            Some("due_date") => SortBy::DueDate,
            Some("priority") => SortBy::Priority,
            Some(_) => return Err(QueryError::InvalidSortBy),
        };

        let order = match params.order.as_deref() {
            None => SortOrder::Asc,
            Some("asc") => SortOrder::Asc,
            Some("desc") => SortOrder::Desc,
            Some(_) => return Err(QueryError::InvalidOrder),
        };

        Ok(Self {
            due_before,
            due_after,
            priority,
            status,
            sort_by,
            order,
        })
    }
}

fn parse_date(s: &str, field: &'static str) -> Result<NaiveDate, QueryError> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| QueryError::InvalidDate { field })
}

/// Sorts tasks per the validated query
///
/// When sorting by due date, equal dates fall back to ascending priority
/// rank regardless of the primary direction. When sorting by priority, the
/// rank is the whole ordering. The sort is stable, so tasks that compare
/// equal keep their store order (ascending id).
pub fn sort_tasks(tasks: &mut [Task], sort_by: SortBy, order: SortOrder) {
    match sort_by {
        SortBy::Priority => {
            tasks.sort_by(|a, b| order.apply(a.priority.rank().cmp(&b.priority.rank())));
        }
        SortBy::DueDate => {
            tasks.sort_by(|a, b| {
                order
                    .apply(a.due_date.cmp(&b.due_date))
                    .then_with(|| a.priority.rank().cmp(&b.priority.rank()))
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task(id: i64, due: &str, priority: Priority) -> Task {
        Task {
            id,
            title: format!("task-{}", id),
            description: None,
            due_date: NaiveDate::parse_from_str(due, "%Y-%m-%d").unwrap(),
            priority,
            status: false,
            user_id: 1,
        }
    }

    fn params(kv: &[(&str, &str)]) -> TaskQueryParams {
        let mut p = TaskQueryParams::default();
        for (k, v) in kv {
            let v = Some(v.to_string());
            match *k {
                "due_before" => p.due_before = v,
                "due_after" => p.due_after = v,
                "priority" => p.priority = v,
                "status" => p.status = v,
                "sort_by" => p.sort_by = v,
                "order" => p.order = v,
                _ => unreachable!(),
            }
        }
        p
    }

    #[test]
    fn test_parse_defaults() {
        let query = TaskQuery::parse(&TaskQueryParams::default()).unwrap();

        assert_eq!(query.due_before, None);
        assert_eq!(query.due_after, None);
        assert_eq!(query.priority, None);
        assert_eq!(query.status, None);
        assert_eq!(query.sort_by, SortBy::DueDate);
        assert_eq!(query.order, SortOrder::Asc);
    }

    #[test]
    fn test_parse_valid_dates() {
        let query = TaskQuery::parse(&params(&[
            ("due_before", "2024-06-30"),
            ("due_after", "2024-01-01"),
        ]))
        .unwrap();

        assert_eq!(
            query.due_before,
            Some(NaiveDate::from_ymd_opt(2024, 6, 30).unwrap())
        );
        assert_eq!(
            query.due_after,
            Some(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap())
        );
    }

    #[test]
    fn test_parse_rejects_bad_dates() {
        let result = TaskQuery::parse(&params(&[("due_before", "30-06-2024")]));
        assert_eq!(
            result,
            Err(QueryError::InvalidDate {
                field: "due_before"
            })
        );

        let result = TaskQuery::parse(&params(&[("due_after", "2024-13-01")]));
        assert_eq!(result, Err(QueryError::InvalidDate { field: "due_after" }));

        let result = TaskQuery::parse(&params(&[("due_after", "soon")]));
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_status_is_strict_but_case_insensitive() {
        let query = TaskQuery::parse(&params(&[("status", "TRUE")])).unwrap();
        assert_eq!(query.status, Some(true));

        let query = TaskQuery::parse(&params(&[("status", "False")])).unwrap();
        assert_eq!(query.status, Some(false));

        let result = TaskQuery::parse(&params(&[("status", "maybe")]));
        assert_eq!(result, Err(QueryError::InvalidStatus));

        let result = TaskQuery::parse(&params(&[("status", "1")]));
        assert_eq!(result, Err(QueryError::InvalidStatus));
    }

    #[test]
    fn test_parse_unknown_priority_is_silently_ignored() {
        let query = TaskQuery::parse(&params(&[("priority", "High")])).unwrap();
        assert_eq!(query.priority, Some(Priority::High));

        // Not part of the closed enum: the filter is dropped, not rejected.
        let query = TaskQuery::parse(&params(&[("priority", "Urgent")])).unwrap();
        assert_eq!(query.priority, None);

        let query = TaskQuery::parse(&params(&[("priority", "high")])).unwrap();
        assert_eq!(query.priority, None);
    }

    #[test]
    fn test_parse_rejects_unknown_sort_fields() {
        let query = TaskQuery::parse(&params(&[("sort_by", "priority")])).unwrap();
        assert_eq!(query.sort_by, SortBy::Priority);

        let result = TaskQuery::parse(&params(&[("sort_by", "title")]));
        assert_eq!(result, Err(QueryError::InvalidSortBy));

        let result = TaskQuery::parse(&params(&[("order", "descending")]));
        assert_eq!(result, Err(QueryError::InvalidOrder));
    }

    #[test]
    fn test_query_error_fields() {
        assert_eq!(
            QueryError::InvalidDate { field: "due_after" }.field(),
            "due_after"
        );
        assert_eq!(QueryError::InvalidStatus.field(), "status");
        assert_eq!(QueryError::InvalidSortBy.field(), "sort_by");
        assert_eq!(QueryError::InvalidOrder.field(), "order");
    }

    #[test]
    fn test_sort_due_date_asc_breaks_ties_by_priority_rank() {
        let mut tasks = vec![
            task(1, "2024-01-01", Priority::Low),
            task(2, "2024-01-01", Priority::High),
            task(3, "2024-01-02", Priority::Medium),
        ];

        sort_tasks(&mut tasks, SortBy::DueDate, SortOrder::Asc);

        let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![2, 1, 3]);
    }

    #[test]
    fn test_sort_due_date_desc_keeps_ascending_tie_break() {
        let mut tasks = vec![
            task(1, "2024-01-01", Priority::Low),
            task(2, "2024-01-01", Priority::High),
            task(3, "2024-01-02", Priority::Medium),
        ];

        sort_tasks(&mut tasks, SortBy::DueDate, SortOrder::Desc);

        // Dates descend, but the 2024-01-01 tie still resolves High before
        // Low.
        let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_by_priority_ignores_due_date() {
        let mut tasks = vec![
            task(1, "2024-03-01", Priority::Low),
            task(2, "2024-01-01", Priority::Medium),
            task(3, "2024-02-01", Priority::High),
        ];

        sort_tasks(&mut tasks, SortBy::Priority, SortOrder::Asc);
        let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);

        sort_tasks(&mut tasks, SortBy::Priority, SortOrder::Desc);
        let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_sort_is_stable_for_equal_keys() {
        let mut tasks = vec![
            task(10, "2024-01-01", Priority::Medium),
            task(11, "2024-01-01", Priority::Medium),
            task(12, "2024-01-01", Priority::Medium),
        ];

        sort_tasks(&mut tasks, SortBy::DueDate, SortOrder::Desc);

        let ids: Vec<i64> = tasks.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![10, 11, 12]);
    }
}
