/// Three-state update for one key of a partial change.
///
/// - `NoChange`: key keeps its current value
/// - `Set(value)`: key is replaced with the provided value
/// - `Clear`: key is removed
///
/// # Example
///
/// ```
/// use planner_domain::FieldUpdate;
///
/// let mut task = Some(42);
/// FieldUpdate::NoChange.apply_to(&mut task);
/// assert_eq!(task, Some(42));
///
/// FieldUpdate::Clear.apply_to(&mut task);
/// assert_eq!(task, None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    NoChange,
    Set(T),
    Clear,
}

impl<T> Default for FieldUpdate<T> {
    fn default() -> Self {
        FieldUpdate::NoChange
    }
}

impl<T> FieldUpdate<T> {
    pub fn apply_to(self, field: &mut Option<T>) {
        match self {
            FieldUpdate::NoChange => {}
            FieldUpdate::Set(value) => *field = Some(value),
            FieldUpdate::Clear => *field = None,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, FieldUpdate::NoChange)
    }
}

impl FieldUpdate<bool> {
    /// Flags only exist while true, so `Set(false)` behaves like `Clear`.
    pub fn apply_to_flag(self, flag: &mut bool) {
        match self {
            FieldUpdate::NoChange => {}
            FieldUpdate::Set(value) => *flag = value,
            FieldUpdate::Clear => *flag = false,
        }
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    /// `Some(value)` becomes `Set(value)`, `None` becomes `Clear`.
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(value) => FieldUpdate::Set(value),
            None => FieldUpdate::Clear,
        }
    }
}
