//! Patch catalog: ordered, contiguously numbered patch records.
//!
//! The catalog mirrors the patch files on the SD card. Records are kept in
//! ascending program-number order and numbered contiguously from
//! [`FIRST_PROGRAM`]. The UI never holds the catalog itself; it gets
//! copies of the handful of records a page needs through
//! [`RecallView`], [`SaveView`] and [`DeleteView`].
//!
//! ```text
//! programs:  1        2        3        4
//!          ┌────────┬────────┬────────┬────────┐
//!          │ Brass  │ Strings│ Bass   │ Lead   │
//!          └────────┴────────┴────────┴────────┘
//! delete(2) ──► 1 Brass, 2 Bass, 3 Lead   (two records renumbered)
//! ```

use heapless::{String, Vec};

use crate::error::CatalogError;
use crate::{DELETE_FLOOR, FIRST_PROGRAM, INIT_PATCH_NAME, MAX_PATCHES, PATCH_NAME_MAX_LEN};

/// Bounded patch name.
///
/// Construction rejects names longer than [`PATCH_NAME_MAX_LEN`] bytes
/// instead of truncating them. Non-ASCII characters take more than one
/// byte each and shorten the limit accordingly.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PatchName(String<PATCH_NAME_MAX_LEN>);

impl PatchName {
    /// Validate and copy `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use memorymode::catalog::PatchName;
    /// use memorymode::CatalogError;
    ///
    /// assert_eq!(PatchName::new("Brass").unwrap().as_str(), "Brass");
    /// assert_eq!(
    ///     PatchName::new("A name far too long for the panel"),
    ///     Err(CatalogError::NameTooLong)
    /// );
    /// ```
    pub fn new(name: &str) -> Result<Self, CatalogError> {
        let mut s = String::new();
        s.push_str(name).map_err(|_| CatalogError::NameTooLong)?;
        Ok(Self(s))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Append one character. Fails with [`CatalogError::NameTooLong`] when full.
    pub fn push(&mut self, c: char) -> Result<(), CatalogError> {
        self.0.push(c).map_err(|_| CatalogError::NameTooLong)
    }

    /// Remove and return the last character.
    pub fn pop(&mut self) -> Option<char> {
        self.0.pop()
    }
}

/// A stored patch: program number and name.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PatchRecord {
    pub program: u16,
    pub name: PatchName,
}

/// Result of [`PatchCatalog::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SaveOutcome {
    /// An existing slot was overwritten.
    Overwritten(u16),
    /// A new highest-numbered slot was created.
    Appended(u16),
}

/// Result of [`PatchCatalog::delete`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeleteOutcome {
    /// The record that was removed.
    pub removed: PatchRecord,
    /// Number of following records whose program number changed.
    pub renumbered: usize,
}

/// Records shown on the Recall page around the selection.
///
/// `previous`/`next` are `None` at the catalog boundaries, where the
/// clamped neighbor is the selection itself.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RecallView {
    pub previous: Option<PatchRecord>,
    pub selected: PatchRecord,
    pub next: Option<PatchRecord>,
}

/// Records shown on the Delete page.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DeleteView {
    pub previous: Option<PatchRecord>,
    pub candidate: PatchRecord,
}

/// Records shown on the Save page: the staging slot before the cursor and
/// the slot that will be written.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SaveView {
    pub previous: Option<PatchRecord>,
    pub target: PatchRecord,
}

/// Ordered collection of patch records.
pub struct PatchCatalog {
    records: Vec<PatchRecord, MAX_PATCHES>,
}

impl Default for PatchCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl PatchCatalog {
    /// Create an empty catalog.
    ///
    /// An empty catalog only exists during boot, before the SD card index
    /// has been loaded.
    pub const fn new() -> Self {
        Self { records: Vec::new() }
    }

    /// Build a catalog from names, numbering them from [`FIRST_PROGRAM`].
    pub fn from_names<'a, I>(names: I) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut catalog = Self::new();
        for name in names {
            catalog.insert(PatchName::new(name)?)?;
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatchRecord> {
        self.records.iter()
    }

    // ── Navigation ───────────────────────────────────────────────────

    /// Lowest-numbered record.
    pub fn first(&self) -> Result<&PatchRecord, CatalogError> {
        self.records.first().ok_or(CatalogError::EmptyCatalog)
    }

    /// Highest-numbered record.
    pub fn last(&self) -> Result<&PatchRecord, CatalogError> {
        self.records.last().ok_or(CatalogError::EmptyCatalog)
    }

    /// Record at a zero-based position in program order.
    pub fn at(&self, index: usize) -> Result<&PatchRecord, CatalogError> {
        self.records.get(index).ok_or(CatalogError::OutOfRange)
    }

    /// Zero-based position of `program`.
    pub fn position(&self, program: u16) -> Result<usize, CatalogError> {
        if self.records.is_empty() {
            return Err(CatalogError::EmptyCatalog);
        }
        self.records
            .binary_search_by_key(&program, |r| r.program)
            .map_err(|_| CatalogError::UnknownPatch)
    }

    /// Record carrying `program`.
    pub fn get(&self, program: u16) -> Result<&PatchRecord, CatalogError> {
        self.position(program).map(|i| &self.records[i])
    }

    /// Record `offset` positions away from `program`, clamped at both ends.
    ///
    /// # Examples
    ///
    /// ```
    /// use memorymode::PatchCatalog;
    ///
    /// let catalog = PatchCatalog::from_names(["Brass", "Bass", "Lead"]).unwrap();
    /// assert_eq!(catalog.neighbor(2, 1).unwrap().program, 3);
    /// // Clamped at the end rather than wrapping or failing.
    /// assert_eq!(catalog.neighbor(3, 1).unwrap().program, 3);
    /// assert_eq!(catalog.neighbor(1, -5).unwrap().program, 1);
    /// ```
    pub fn neighbor(&self, program: u16, offset: i32) -> Result<&PatchRecord, CatalogError> {
        let pos = self.position(program)? as i64;
        let last = self.records.len() as i64 - 1;
        let target = (pos + offset as i64).clamp(0, last);
        Ok(&self.records[target as usize])
    }

    /// Program number the next appended record will receive.
    pub fn next_program(&self) -> u16 {
        self.records
            .last()
            .map_or(FIRST_PROGRAM, |r| r.program + 1)
    }

    // ── Mutation ─────────────────────────────────────────────────────

    /// Append a record with the next program number and return that number.
    pub fn insert(&mut self, name: PatchName) -> Result<u16, CatalogError> {
        let program = self.next_program();
        self.records
            .push(PatchRecord { program, name })
            .map_err(|_| CatalogError::CatalogFull)?;
        Ok(program)
    }

    /// Overwrite an existing slot or append the next highest one.
    ///
    /// The patch content itself is written to the SD card by the caller;
    /// the catalog only tracks number and name.
    pub fn save(&mut self, program: u16, name: PatchName) -> Result<SaveOutcome, CatalogError> {
        if let Ok(pos) = self.position(program) {
            self.records[pos].name = name;
            #[cfg(feature = "defmt")]
            defmt::info!("catalog: overwrote program {}", program);
            return Ok(SaveOutcome::Overwritten(program));
        }
        if program != self.next_program() {
            return Err(CatalogError::OutOfRange);
        }
        let program = self.insert(name)?;
        #[cfg(feature = "defmt")]
        defmt::info!("catalog: appended program {}", program);
        Ok(SaveOutcome::Appended(program))
    }

    /// Rename a record in place.
    ///
    /// Length validation happens in [`PatchName::new`], before the catalog
    /// is touched.
    pub fn rename(&mut self, program: u16, name: PatchName) -> Result<(), CatalogError> {
        let pos = self.position(program)?;
        self.records[pos].name = name;
        Ok(())
    }

    /// Remove `program` and renumber every following record down by one.
    ///
    /// This touches every later record (and, in the firmware, every later
    /// file on the SD card), so the UI shows the DeleteMessage page while
    /// it runs.
    ///
    /// # Examples
    ///
    /// ```
    /// use memorymode::PatchCatalog;
    ///
    /// let mut catalog = PatchCatalog::from_names(["A", "B", "C", "D"]).unwrap();
    /// let outcome = catalog.delete(2).unwrap();
    /// assert_eq!(outcome.removed.name.as_str(), "B");
    /// assert_eq!(outcome.renumbered, 2);
    /// assert_eq!(catalog.last().unwrap().program, 3);
    /// ```
    pub fn delete(&mut self, program: u16) -> Result<DeleteOutcome, CatalogError> {
        let pos = self.position(program)?;
        if self.records.len() <= DELETE_FLOOR {
            #[cfg(feature = "defmt")]
            defmt::warn!("catalog: delete of program {} refused at floor", program);
            return Err(CatalogError::DeleteFloor);
        }
        let removed = self.records.remove(pos);
        let renumbered = self.renumber();
        #[cfg(feature = "defmt")]
        defmt::info!(
            "catalog: deleted program {}, renumbered {}",
            program,
            renumbered
        );
        Ok(DeleteOutcome {
            removed,
            renumbered,
        })
    }

    /// Re-establish contiguous numbering from [`FIRST_PROGRAM`].
    ///
    /// Returns the number of records whose program number changed.
    pub fn renumber(&mut self) -> usize {
        let mut changed = 0;
        for (i, record) in self.records.iter_mut().enumerate() {
            let expected = FIRST_PROGRAM + i as u16;
            if record.program != expected {
                record.program = expected;
                changed += 1;
            }
        }
        changed
    }

    // ── Page views ───────────────────────────────────────────────────

    /// Selection plus its clamped neighbors for the Recall page.
    pub fn recall_view(&self, program: u16) -> Result<RecallView, CatalogError> {
        let selected = self.get(program)?.clone();
        Ok(RecallView {
            previous: self.distinct_neighbor(program, -1)?,
            next: self.distinct_neighbor(program, 1)?,
            selected,
        })
    }

    /// Candidate plus the record before it for the Delete page.
    pub fn delete_view(&self, program: u16) -> Result<DeleteView, CatalogError> {
        Ok(DeleteView {
            candidate: self.get(program)?.clone(),
            previous: self.distinct_neighbor(program, -1)?,
        })
    }

    /// Open a pending-save staging list over the committed records.
    pub fn stage_save(&self) -> SaveStaging {
        let fresh = (self.records.len() < MAX_PATCHES).then(|| PatchRecord {
            program: self.next_program(),
            name: PatchName::new(INIT_PATCH_NAME).unwrap_or_default(),
        });
        let committed = self.records.len();
        let slots = committed + usize::from(fresh.is_some());
        SaveStaging {
            committed,
            fresh,
            cursor: slots.saturating_sub(1),
        }
    }

    fn distinct_neighbor(
        &self,
        program: u16,
        offset: i32,
    ) -> Result<Option<PatchRecord>, CatalogError> {
        let n = self.neighbor(program, offset)?;
        Ok((n.program != program).then(|| n.clone()))
    }
}

/// Pending-save view: the committed records plus one fresh slot.
///
/// The cursor starts on the fresh slot, so the Save page initially shows
/// the current last patch (second-to-last in staging) above the newly
/// assigned slot. Scrolling moves the cursor over existing slots to pick
/// one to overwrite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveStaging {
    committed: usize,
    fresh: Option<PatchRecord>,
    cursor: usize,
}

impl SaveStaging {
    /// Number of slots in staging (committed records plus the fresh slot).
    pub fn len(&self) -> usize {
        self.committed + usize::from(self.fresh.is_some())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Move the cursor by `delta`, clamped to the staging list.
    pub fn scroll(&mut self, delta: i32) {
        let last = self.len().saturating_sub(1) as i64;
        self.cursor = (self.cursor as i64 + delta as i64).clamp(0, last) as usize;
    }

    /// Slot the save will write to.
    pub fn target(&self, catalog: &PatchCatalog) -> Result<PatchRecord, CatalogError> {
        self.slot(catalog, self.cursor)
    }

    /// Records for the Save page.
    pub fn view(&self, catalog: &PatchCatalog) -> Result<SaveView, CatalogError> {
        let previous = match self.cursor.checked_sub(1) {
            Some(i) => Some(self.slot(catalog, i)?),
            None => None,
        };
        Ok(SaveView {
            previous,
            target: self.target(catalog)?,
        })
    }

    fn slot(&self, catalog: &PatchCatalog, index: usize) -> Result<PatchRecord, CatalogError> {
        if catalog.len() != self.committed {
            // Catalog changed under an open staging list.
            return Err(CatalogError::OutOfRange);
        }
        if index < self.committed {
            return catalog.at(index).cloned();
        }
        match (&self.fresh, index == self.committed) {
            (Some(fresh), true) => Ok(fresh.clone()),
            (None, _) if self.committed == 0 => Err(CatalogError::EmptyCatalog),
            _ => Err(CatalogError::OutOfRange),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(n: usize) -> PatchCatalog {
        let names = ["Brass", "Strings", "Bass", "Lead", "Pad", "Sync", "Bell", "Organ"];
        PatchCatalog::from_names(names.iter().copied().take(n)).unwrap()
    }

    fn name(s: &str) -> PatchName {
        PatchName::new(s).unwrap()
    }

    // ── Boundaries ───────────────────────────────────────────────────

    #[test]
    fn empty_catalog_boundaries_fail() {
        let c = PatchCatalog::new();
        assert_eq!(c.first(), Err(CatalogError::EmptyCatalog));
        assert_eq!(c.last(), Err(CatalogError::EmptyCatalog));
        assert_eq!(c.neighbor(1, 1), Err(CatalogError::EmptyCatalog));
    }

    #[test]
    fn first_and_last_follow_program_order() {
        let c = catalog(4);
        assert_eq!(c.first().unwrap().program, 1);
        assert_eq!(c.first().unwrap().name.as_str(), "Brass");
        assert_eq!(c.last().unwrap().program, 4);
        assert_eq!(c.last().unwrap().name.as_str(), "Lead");
    }

    #[test]
    fn at_rejects_index_past_end() {
        let c = catalog(3);
        assert_eq!(c.at(2).unwrap().program, 3);
        assert_eq!(c.at(3), Err(CatalogError::OutOfRange));
    }

    #[test]
    fn unknown_program_is_reported() {
        let c = catalog(3);
        assert_eq!(c.get(9), Err(CatalogError::UnknownPatch));
        assert_eq!(c.neighbor(0, 1), Err(CatalogError::UnknownPatch));
    }

    // ── Neighbors ────────────────────────────────────────────────────

    #[test]
    fn neighbor_at_last_plus_one_is_last() {
        let c = catalog(5);
        let last = c.last().unwrap().clone();
        assert_eq!(c.neighbor(last.program, 1).unwrap(), &last);
    }

    #[test]
    fn neighbor_at_first_minus_one_is_first() {
        let c = catalog(5);
        assert_eq!(c.neighbor(1, -1).unwrap().program, 1);
    }

    #[test]
    fn neighbor_steps_inside_catalog() {
        let c = catalog(5);
        assert_eq!(c.neighbor(3, -1).unwrap().program, 2);
        assert_eq!(c.neighbor(3, 1).unwrap().program, 4);
    }

    // ── Delete / renumber ────────────────────────────────────────────

    #[test]
    fn deleting_last_renumbers_nothing() {
        let mut c = catalog(4);
        let outcome = c.delete(4).unwrap();
        assert_eq!(outcome.renumbered, 0);
        assert_eq!(outcome.removed.name.as_str(), "Lead");
        let programs: Vec<u16, 8> = c.iter().map(|r| r.program).collect();
        assert_eq!(programs.as_slice(), &[1, 2, 3]);
    }

    #[test]
    fn deleting_middle_shifts_following_programs_down() {
        let mut c = catalog(6);
        let old_last = c.last().unwrap().program;
        let outcome = c.delete(2).unwrap();
        assert_eq!(outcome.renumbered, 4);
        assert_eq!(c.last().unwrap().program, old_last - 1);
        // "Bass" was program 3 and moves to 2.
        assert_eq!(c.get(2).unwrap().name.as_str(), "Bass");
        for (i, r) in c.iter().enumerate() {
            assert_eq!(r.program, FIRST_PROGRAM + i as u16);
        }
    }

    #[test]
    fn delete_refused_at_floor() {
        let mut c = catalog(1);
        assert_eq!(c.delete(1), Err(CatalogError::DeleteFloor));
        assert_eq!(c.len(), 1);
    }

    #[test]
    fn delete_unknown_program_fails() {
        let mut c = catalog(3);
        assert_eq!(c.delete(7), Err(CatalogError::UnknownPatch));
    }

    // ── Save / rename ────────────────────────────────────────────────

    #[test]
    fn save_overwrites_existing_slot() {
        let mut c = catalog(3);
        assert_eq!(c.save(2, name("Choir")), Ok(SaveOutcome::Overwritten(2)));
        assert_eq!(c.get(2).unwrap().name.as_str(), "Choir");
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn save_appends_next_slot() {
        let mut c = catalog(3);
        assert_eq!(c.save(4, name("Choir")), Ok(SaveOutcome::Appended(4)));
        assert_eq!(c.last().unwrap().name.as_str(), "Choir");
    }

    #[test]
    fn save_rejects_gap() {
        let mut c = catalog(3);
        assert_eq!(c.save(6, name("Choir")), Err(CatalogError::OutOfRange));
    }

    #[test]
    fn rename_in_place() {
        let mut c = catalog(3);
        c.rename(1, name("Fat Brass")).unwrap();
        assert_eq!(c.first().unwrap().name.as_str(), "Fat Brass");
    }

    #[test]
    fn over_length_name_rejected_before_catalog() {
        assert_eq!(
            PatchName::new("Seventeen chars!!"),
            Err(CatalogError::NameTooLong)
        );
        assert!(PatchName::new("Sixteen chars!!!").is_ok());
    }

    #[test]
    fn name_limit_counts_bytes() {
        // 15 characters, 16 bytes.
        let fits = PatchName::new("Cr\u{e8}me Brass 123").unwrap();
        assert_eq!(fits.len(), PATCH_NAME_MAX_LEN);
        // 16 characters, 17 bytes.
        assert_eq!(
            PatchName::new("Cr\u{e8}me Brass 1234"),
            Err(CatalogError::NameTooLong)
        );
    }

    // ── Views ────────────────────────────────────────────────────────

    #[test]
    fn recall_view_in_middle() {
        let c = catalog(4);
        let v = c.recall_view(2).unwrap();
        assert_eq!(v.previous.unwrap().program, 1);
        assert_eq!(v.selected.program, 2);
        assert_eq!(v.next.unwrap().program, 3);
    }

    #[test]
    fn recall_view_at_boundaries_has_no_wrap() {
        let c = catalog(4);
        assert!(c.recall_view(1).unwrap().previous.is_none());
        assert!(c.recall_view(4).unwrap().next.is_none());
    }

    #[test]
    fn delete_view_shows_previous_record() {
        let c = catalog(4);
        let v = c.delete_view(3).unwrap();
        assert_eq!(v.candidate.name.as_str(), "Bass");
        assert_eq!(v.previous.unwrap().name.as_str(), "Strings");
    }

    #[test]
    fn staging_starts_on_fresh_slot() {
        let c = catalog(3);
        let staging = c.stage_save();
        assert_eq!(staging.len(), 4);
        let v = staging.view(&c).unwrap();
        assert_eq!(v.previous.unwrap().program, 3);
        assert_eq!(v.target.program, 4);
        assert_eq!(v.target.name.as_str(), INIT_PATCH_NAME);
        // Staging does not touch the committed catalog.
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn staging_scroll_clamps_and_targets_existing_slot() {
        let c = catalog(3);
        let mut staging = c.stage_save();
        staging.scroll(-2);
        assert_eq!(staging.target(&c).unwrap().program, 2);
        staging.scroll(-10);
        assert_eq!(staging.cursor(), 0);
        assert!(staging.view(&c).unwrap().previous.is_none());
        staging.scroll(10);
        assert_eq!(staging.target(&c).unwrap().program, 4);
    }

    #[test]
    fn staging_on_empty_catalog_offers_first_program() {
        let c = PatchCatalog::new();
        let staging = c.stage_save();
        let v = staging.view(&c).unwrap();
        assert!(v.previous.is_none());
        assert_eq!(v.target.program, FIRST_PROGRAM);
    }

    #[test]
    fn staging_detects_catalog_change() {
        let mut c = catalog(3);
        let staging = c.stage_save();
        c.delete(1).unwrap();
        assert_eq!(staging.view(&c), Err(CatalogError::OutOfRange));
    }

    #[test]
    fn commit_from_staging_appends() {
        let mut c = catalog(2);
        let staging = c.stage_save();
        let target = staging.target(&c).unwrap();
        assert_eq!(
            c.save(target.program, name("New")),
            Ok(SaveOutcome::Appended(3))
        );
    }
}
