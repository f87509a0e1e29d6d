// ---------------------------------------------------------------------------
// Column role assignment
// ---------------------------------------------------------------------------

/// Which loaded column plays which role in the analysis.
///
/// Only [`ColumnSelection`] mutates this, so the band invariants hold at all
/// times:
/// * `display_band` / `break_indicator_band` are unset or members of `bands`
/// * `bands` never contains the date or QA column
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnRoles {
    date_column: Option<String>,
    qa_enabled: bool,
    qa_column: Option<String>,
    bands: Vec<String>,
    display_band: Option<String>,
    break_indicator_band: Option<String>,
}

impl ColumnRoles {
    pub fn date_column(&self) -> Option<&str> {
        self.date_column.as_deref()
    }

    pub fn qa_enabled(&self) -> bool {
        self.qa_enabled
    }

    /// The QA column, only while QA is enabled.
    pub fn qa_column(&self) -> Option<&str> {
        if self.qa_enabled {
            self.qa_column.as_deref()
        } else {
            None
        }
    }

    /// Selected bands in insertion order.
    pub fn bands(&self) -> &[String] {
        &self.bands
    }

    pub fn display_band(&self) -> Option<&str> {
        self.display_band.as_deref()
    }

    pub fn break_indicator_band(&self) -> Option<&str> {
        self.break_indicator_band.as_deref()
    }
}

// ---------------------------------------------------------------------------
// ColumnSelection – available columns + role assignment
// ---------------------------------------------------------------------------

/// Interactive column selection state.
///
/// Every operation is total: a request that would break an invariant is
/// ignored rather than reported.
#[derive(Debug, Clone, Default)]
pub struct ColumnSelection {
    available: Vec<String>,
    roles: ColumnRoles,
}

impl ColumnSelection {
    /// Replace the available columns and clear every role.
    pub fn load(&mut self, columns: Vec<String>) {
        log::debug!("column selection reset with {} columns", columns.len());
        self.available = columns;
        self.roles = ColumnRoles::default();
    }

    pub fn available(&self) -> &[String] {
        &self.available
    }

    pub fn roles(&self) -> &ColumnRoles {
        &self.roles
    }

    fn is_available(&self, name: &str) -> bool {
        self.available.iter().any(|c| c == name)
    }

    fn is_band(&self, name: &str) -> bool {
        self.roles.bands.iter().any(|b| b == name)
    }

    /// Append a band. The first band becomes display and break-indicator band.
    pub fn add_band(&mut self, name: &str) {
        let roles = &self.roles;
        if !self.is_available(name)
            || self.is_band(name)
            || roles.date_column.as_deref() == Some(name)
            || roles.qa_column.as_deref() == Some(name)
        {
            return;
        }
        self.roles.bands.push(name.to_string());
        if self.roles.display_band.is_none() {
            self.roles.display_band = Some(name.to_string());
        }
        if self.roles.break_indicator_band.is_none() {
            self.roles.break_indicator_band = Some(name.to_string());
        }
    }

    /// Remove a band, handing its display / break-indicator role to the new
    /// first band.
    pub fn remove_band(&mut self, name: &str) {
        let Some(pos) = self.roles.bands.iter().position(|b| b == name) else {
            return;
        };
        self.roles.bands.remove(pos);

        let first = self.roles.bands.first().cloned();
        if self.roles.display_band.as_deref() == Some(name) {
            self.roles.display_band = first.clone();
        }
        if self.roles.break_indicator_band.as_deref() == Some(name) {
            self.roles.break_indicator_band = first;
        }
    }

    pub fn set_date(&mut self, name: &str) {
        if self.is_available(name) && !self.is_band(name) {
            self.roles.date_column = Some(name.to_string());
        }
    }

    pub fn set_qa_enabled(&mut self, enabled: bool) {
        self.roles.qa_enabled = enabled;
        if !enabled {
            self.roles.qa_column = None;
        }
    }

    pub fn set_qa(&mut self, name: &str) {
        if self.roles.qa_enabled && self.is_available(name) && !self.is_band(name) {
            self.roles.qa_column = Some(name.to_string());
        }
    }

    pub fn set_display_band(&mut self, name: &str) {
        if self.is_band(name) {
            self.roles.display_band = Some(name.to_string());
        }
    }

    pub fn set_break_indicator_band(&mut self, name: &str) {
        if self.is_band(name) {
            self.roles.break_indicator_band = Some(name.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection(cols: &[&str]) -> ColumnSelection {
        let mut sel = ColumnSelection::default();
        sel.load(cols.iter().map(|c| c.to_string()).collect());
        sel
    }

    fn roles_consistent(roles: &ColumnRoles) -> bool {
        let in_bands = |b: Option<&str>| b.map_or(true, |b| roles.bands().iter().any(|x| x == b));
        in_bands(roles.display_band()) && in_bands(roles.break_indicator_band())
    }

    #[test]
    fn first_band_takes_both_roles() {
        let mut sel = selection(&["dates", "blue", "green"]);
        sel.add_band("blue");
        assert_eq!(sel.roles().display_band(), Some("blue"));
        assert_eq!(sel.roles().break_indicator_band(), Some("blue"));

        sel.add_band("green");
        assert_eq!(sel.roles().display_band(), Some("blue"));
        assert_eq!(sel.roles().bands(), ["blue", "green"]);
    }

    #[test]
    fn removing_sole_band_clears_roles() {
        let mut sel = selection(&["dates", "blue"]);
        sel.add_band("blue");
        sel.remove_band("blue");
        assert!(sel.roles().bands().is_empty());
        assert_eq!(sel.roles().display_band(), None);
        assert_eq!(sel.roles().break_indicator_band(), None);
    }

    #[test]
    fn removing_role_band_moves_role_to_first() {
        let mut sel = selection(&["blue", "green", "red"]);
        sel.add_band("blue");
        sel.add_band("green");
        sel.add_band("red");
        sel.set_display_band("red");
        sel.set_break_indicator_band("green");

        sel.remove_band("red");
        assert_eq!(sel.roles().display_band(), Some("blue"));
        assert_eq!(sel.roles().break_indicator_band(), Some("green"));

        sel.remove_band("blue");
        assert_eq!(sel.roles().display_band(), Some("green"));
        assert_eq!(sel.roles().break_indicator_band(), Some("green"));
    }

    #[test]
    fn add_band_rejects_date_qa_and_duplicates() {
        let mut sel = selection(&["dates", "qa", "blue"]);
        sel.set_date("dates");
        sel.set_qa_enabled(true);
        sel.set_qa("qa");

        sel.add_band("dates");
        sel.add_band("qa");
        sel.add_band("blue");
        sel.add_band("blue");
        sel.add_band("missing");
        assert_eq!(sel.roles().bands(), ["blue"]);
    }

    #[test]
    fn role_setters_ignore_non_bands() {
        let mut sel = selection(&["blue", "green"]);
        sel.add_band("blue");
        sel.set_display_band("green");
        sel.set_break_indicator_band("nope");
        assert_eq!(sel.roles().display_band(), Some("blue"));
        assert_eq!(sel.roles().break_indicator_band(), Some("blue"));
    }

    #[test]
    fn qa_column_follows_toggle() {
        let mut sel = selection(&["dates", "qa"]);
        sel.set_qa("qa");
        assert_eq!(sel.roles().qa_column(), None);

        sel.set_qa_enabled(true);
        assert_eq!(sel.roles().qa_column(), None);
        sel.set_qa("qa");
        assert_eq!(sel.roles().qa_column(), Some("qa"));

        sel.set_qa_enabled(false);
        assert_eq!(sel.roles().qa_column(), None);
        sel.set_qa_enabled(true);
        assert_eq!(sel.roles().qa_column(), None);
    }

    #[test]
    fn set_date_requires_known_column() {
        let mut sel = selection(&["dates", "blue"]);
        sel.set_date("nope");
        assert_eq!(sel.roles().date_column(), None);
        sel.add_band("blue");
        sel.set_date("blue");
        assert_eq!(sel.roles().date_column(), None);
        sel.set_date("dates");
        assert_eq!(sel.roles().date_column(), Some("dates"));
    }

    #[test]
    fn load_resets_everything() {
        let mut sel = selection(&["dates", "qa", "blue"]);
        sel.set_date("dates");
        sel.set_qa_enabled(true);
        sel.set_qa("qa");
        sel.add_band("blue");

        sel.load(vec!["x".into()]);
        assert_eq!(sel.roles(), &ColumnRoles::default());
        assert_eq!(sel.available(), ["x"]);
    }

    #[test]
    fn roles_stay_within_bands_over_edit_sequence() {
        let cols = ["b0", "b1", "b2", "b3", "b4"];
        let mut sel = selection(&cols);
        // Deterministic pseudo-random walk over add/remove/set operations.
        let mut x: u64 = 0x9e37_79b9_7f4a_7c15;
        for _ in 0..2000 {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            let name = cols[(x % cols.len() as u64) as usize];
            match (x >> 8) % 4 {
                0 => sel.add_band(name),
                1 => sel.remove_band(name),
                2 => sel.set_display_band(name),
                _ => sel.set_break_indicator_band(name),
            }
            assert!(roles_consistent(sel.roles()), "{:?}", sel.roles());
            if !sel.roles().bands().is_empty() {
                assert!(sel.roles().display_band().is_some());
                assert!(sel.roles().break_indicator_band().is_some());
            }
        }
    }
}
