use chrono::NaiveDate;
use planner_client::Url;
use planner_domain::route::{
    KEY_CALENDAR, KEY_DAILY_NOTE, KEY_DATE, KEY_PASSWORD, KEY_PASSWORD_ID, KEY_PROJECT, KEY_TASK,
};
use planner_domain::{ProjectSelection, RouteParams};

const DATE_FORMAT: &str = "%Y-%m-%d";

// Only the query component matters; the base never leaves this module.
const SCRATCH_BASE: &str = "http://planner.invalid/";

fn positive_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

/// Decode a location search string (`?project=5&task=42`) into route params.
///
/// Unknown keys are ignored. Ids that fail to parse or are not positive,
/// project ids other than the two reserved ones, and malformed dates are
/// treated as absent. Flags are set only by the literal `true`. When a key
/// repeats, the first occurrence wins.
pub fn parse_query(search: &str) -> RouteParams {
    let mut params = RouteParams::default();
    let Ok(mut url) = Url::parse(SCRATCH_BASE) else {
        return params;
    };
    url.set_query(Some(search.trim().trim_start_matches('?')));

    let mut seen: Vec<String> = Vec::new();
    for (key, value) in url.query_pairs() {
        if seen.iter().any(|k| *k == key) {
            continue;
        }
        seen.push(key.to_string());

        match &*key {
            KEY_PROJECT => {
                params.project = value
                    .trim()
                    .parse::<i64>()
                    .ok()
                    .and_then(ProjectSelection::from_raw)
            }
            KEY_TASK => params.task = positive_id(&value),
            KEY_CALENDAR => params.calendar = value == "true",
            KEY_DATE => params.date = NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).ok(),
            KEY_PASSWORD => params.password = value == "true",
            KEY_PASSWORD_ID => params.password_id = positive_id(&value),
            KEY_DAILY_NOTE => params.daily_note = positive_id(&value),
            other => tracing::trace!("Ignoring unknown route key {}", other),
        }
    }
    params
}

/// Encode route params as a query string without the leading `?`.
///
/// Keys are written in a fixed order; absent values and false flags are
/// omitted, so the empty route encodes to an empty string.
pub fn encode_query(params: &RouteParams) -> String {
    let Ok(mut url) = Url::parse(SCRATCH_BASE) else {
        return String::new();
    };
    {
        let mut pairs = url.query_pairs_mut();
        if let Some(raw) = params.project.and_then(ProjectSelection::to_raw) {
            pairs.append_pair(KEY_PROJECT, &raw.to_string());
        }
        if let Some(task) = params.task {
            pairs.append_pair(KEY_TASK, &task.to_string());
        }
        if params.calendar {
            pairs.append_pair(KEY_CALENDAR, "true");
        }
        if let Some(date) = params.date {
            pairs.append_pair(KEY_DATE, &date.format(DATE_FORMAT).to_string());
        }
        if params.password {
            pairs.append_pair(KEY_PASSWORD, "true");
        }
        if let Some(id) = params.password_id {
            pairs.append_pair(KEY_PASSWORD_ID, &id.to_string());
        }
        if let Some(note) = params.daily_note {
            pairs.append_pair(KEY_DAILY_NOTE, &note.to_string());
        }
    }
    url.query().unwrap_or_default().to_string()
}

/// History entry for the params: `?` plus the query, or empty.
pub fn to_location(params: &RouteParams) -> String {
    let query = encode_query(params);
    if query.is_empty() {
        query
    } else {
        format!("?{}", query)
    }
}
