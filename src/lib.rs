use std::cmp::Reverse;
use std::collections::{HashMap, HashSet};

use bit_set::BitSet;
use instant::{Duration, Instant};
use smallvec::{smallvec, SmallVec};
use thiserror::Error;
use tracing::{debug, trace};

/// The expected maximum number of distinct characters appearing in a word list.
pub const MAX_GLYPH_COUNT: usize = 256;

/// The expected maximum length for a single slot.
pub const MAX_SLOT_LENGTH: usize = 21;

/// An identifier for a given letter, based on its index in the Vocabulary's `glyphs` field.
pub type GlyphId = usize;

/// An identifier for a given slot, based on its index in the GridModel's `variables` field.
pub type VariableId = usize;

/// An identifier for a given word, based on its index in the Vocabulary's `words` field.
pub type WordId = usize;

/// Zero-indexed row and column coords for a cell in the grid, where row 0 is the top row.
pub type GridCoord = (usize, usize);

/// Direction that a slot is facing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Across,
    Down,
}

/// A crossing between one slot and another: cell `cell` of this slot occupies the same grid
/// cell as cell `other_cell` of the slot `other`. Crossings are stored symmetrically, so the
/// overlap relation `overlap(x, y) = (i, j)` always has a mirrored `overlap(y, x) = (j, i)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crossing {
    pub other: VariableId,
    pub cell: usize,
    pub other_cell: usize,
}

/// A word slot in the grid. Static once the model is built; two variables are distinct
/// entities even when they cover overlapping cells.
#[derive(Debug)]
pub struct Variable {
    pub id: VariableId,
    pub start: GridCoord,
    pub direction: Direction,
    pub length: usize,
    pub crossings: SmallVec<[Crossing; MAX_SLOT_LENGTH]>,
}

impl Variable {
    /// The grid coord of the idx-th cell of this slot.
    pub fn cell(&self, idx: usize) -> GridCoord {
        match self.direction {
            Direction::Across => (self.start.0, self.start.1 + idx),
            Direction::Down => (self.start.0 + idx, self.start.1),
        }
    }
}

/// An across or down slot definition in the input to `GridModel::from_entries`.
#[derive(Debug, Clone)]
pub struct GridEntry {
    pub start: GridCoord,
    pub len: usize,
    pub dir: Direction,
}

impl GridEntry {
    fn cell_coords(&self) -> Vec<GridCoord> {
        (0..self.len)
            .map(|cell_idx| match self.dir {
                Direction::Across => (self.start.0, self.start.1 + cell_idx),
                Direction::Down => (self.start.0 + cell_idx, self.start.1),
            })
            .collect()
    }
}

/// Configuration errors detected while building a grid model. These are contract violations
/// by the caller and are always raised before solving begins.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GridError {
    #[error("grid has no slots")]
    EmptyGrid,
    #[error("slot {0} has zero length")]
    EmptySlot(VariableId),
    #[error("more than two slots share the cell at {0:?}")]
    CrowdedCell(GridCoord),
    #[error("crossing between slots {x} and {y} references cell {cell} beyond length {length}")]
    OverlapOutOfBounds {
        x: VariableId,
        y: VariableId,
        cell: usize,
        length: usize,
    },
}

/// The constraint graph: variables plus the crossing relation, with per-variable adjacency
/// precomputed at build time so the search loop never rescans the grid geometry.
#[derive(Debug)]
pub struct GridModel {
    pub variables: Vec<Variable>,
}

impl GridModel {
    /// Build a model from explicit slot definitions, deriving the crossing relation from
    /// the cells each slot covers.
    pub fn from_entries(entries: &[GridEntry]) -> Result<GridModel, GridError> {
        if entries.is_empty() {
            return Err(GridError::EmptyGrid);
        }

        // Map from cell location to the (entry index, cell index) pairs covering it.
        let mut cell_by_loc: HashMap<GridCoord, Vec<(usize, usize)>> = HashMap::new();

        for (entry_idx, entry) in entries.iter().enumerate() {
            if entry.len == 0 {
                return Err(GridError::EmptySlot(entry_idx));
            }
            for (cell_idx, loc) in entry.cell_coords().into_iter().enumerate() {
                cell_by_loc.entry(loc).or_default().push((entry_idx, cell_idx));
            }
        }

        let mut variables = Vec::with_capacity(entries.len());

        for (entry_idx, entry) in entries.iter().enumerate() {
            let mut crossings: SmallVec<[Crossing; MAX_SLOT_LENGTH]> = smallvec![];

            for (cell_idx, loc) in entry.cell_coords().into_iter().enumerate() {
                let sharers: Vec<_> = cell_by_loc[&loc]
                    .iter()
                    .filter(|&&(other_idx, _)| other_idx != entry_idx)
                    .collect();

                if sharers.len() > 1 {
                    return Err(GridError::CrowdedCell(loc));
                }
                if let Some(&&(other, other_cell)) = sharers.first() {
                    crossings.push(Crossing {
                        other,
                        cell: cell_idx,
                        other_cell,
                    });
                }
            }

            variables.push(Variable {
                id: entry_idx,
                start: entry.start,
                direction: entry.dir,
                length: entry.len,
                crossings,
            });
        }

        let model = GridModel { variables };
        model.validate()?;
        Ok(model)
    }

    /// Build a model from a string template, with `.` representing open cells and `#`
    /// representing blocks. Runs of at least two open cells in either direction become slots.
    pub fn from_template(template: &str) -> Result<GridModel, GridError> {
        let rows: Vec<Vec<char>> = template
            .lines()
            .filter_map(|line| {
                let line = line.trim();
                if line.is_empty() {
                    None
                } else {
                    Some(line.chars().collect())
                }
            })
            .collect();

        let mut entries: Vec<GridEntry> = vec![];

        for (row, line) in rows.iter().enumerate() {
            let mut run_start = 0;
            let mut run_len = 0;
            for (col, &cell) in line.iter().enumerate() {
                if cell == '#' {
                    if run_len >= 2 {
                        entries.push(GridEntry {
                            start: (row, run_start),
                            len: run_len,
                            dir: Direction::Across,
                        });
                    }
                    run_len = 0;
                } else {
                    if run_len == 0 {
                        run_start = col;
                    }
                    run_len += 1;
                }
            }
            if run_len >= 2 {
                entries.push(GridEntry {
                    start: (row, run_start),
                    len: run_len,
                    dir: Direction::Across,
                });
            }
        }

        let width = rows.iter().map(|line| line.len()).max().unwrap_or(0);
        for col in 0..width {
            let mut run_start = 0;
            let mut run_len = 0;
            for (row, line) in rows.iter().enumerate() {
                let cell = line.get(col).copied().unwrap_or('#');
                if cell == '#' {
                    if run_len >= 2 {
                        entries.push(GridEntry {
                            start: (run_start, col),
                            len: run_len,
                            dir: Direction::Down,
                        });
                    }
                    run_len = 0;
                } else {
                    if run_len == 0 {
                        run_start = row;
                    }
                    run_len += 1;
                }
            }
            if run_len >= 2 {
                entries.push(GridEntry {
                    start: (run_start, col),
                    len: run_len,
                    dir: Direction::Down,
                });
            }
        }

        GridModel::from_entries(&entries)
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// All crossings of `x`, which doubles as its neighbor set.
    pub fn neighbors(&self, x: VariableId) -> &[Crossing] {
        &self.variables[x].crossings
    }

    /// The overlap indices `(i, j)` such that the i-th letter of `x` must equal the j-th
    /// letter of `y`, or None when the pair never constrains each other.
    pub fn overlap(&self, x: VariableId, y: VariableId) -> Option<(usize, usize)> {
        self.variables[x]
            .crossings
            .iter()
            .find(|crossing| crossing.other == y)
            .map(|crossing| (crossing.cell, crossing.other_cell))
    }

    fn validate(&self) -> Result<(), GridError> {
        for variable in &self.variables {
            for crossing in &variable.crossings {
                if crossing.cell >= variable.length {
                    return Err(GridError::OverlapOutOfBounds {
                        x: variable.id,
                        y: crossing.other,
                        cell: crossing.cell,
                        length: variable.length,
                    });
                }
                let other_length = self.variables[crossing.other].length;
                if crossing.other_cell >= other_length {
                    return Err(GridError::OverlapOutOfBounds {
                        x: crossing.other,
                        y: variable.id,
                        cell: crossing.other_cell,
                        length: other_length,
                    });
                }
            }
        }
        Ok(())
    }
}

/// A word that can be chosen for a slot of matching length.
#[derive(Debug)]
pub struct Word {
    pub string: String,
    pub glyphs: SmallVec<[GlyphId; MAX_SLOT_LENGTH]>,
}

/// An interned word list. Words are normalized to lowercase and deduplicated in encounter
/// order, so word ids are stable across runs for the same input.
#[derive(Debug)]
pub struct Vocabulary {
    pub words: Vec<Word>,
    pub glyphs: SmallVec<[char; MAX_GLYPH_COUNT]>,
}

impl Vocabulary {
    pub fn new<I, S>(input: I) -> Vocabulary
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut words: Vec<Word> = vec![];
        let mut seen: HashSet<String> = HashSet::new();
        let mut glyphs: SmallVec<[char; MAX_GLYPH_COUNT]> = smallvec![];
        let mut glyph_ids: HashMap<char, GlyphId> = HashMap::new();

        for raw in input {
            let normalized = raw.as_ref().trim().to_lowercase();
            if normalized.is_empty() || !seen.insert(normalized.clone()) {
                continue;
            }

            let word_glyphs = normalized
                .chars()
                .map(|c| {
                    *glyph_ids.entry(c).or_insert_with(|| {
                        glyphs.push(c);
                        glyphs.len() - 1
                    })
                })
                .collect();

            words.push(Word {
                string: normalized,
                glyphs: word_glyphs,
            });
        }

        Vocabulary { words, glyphs }
    }

    pub fn word(&self, id: WordId) -> &Word {
        &self.words[id]
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }
}

type GlyphCountsByCell = Vec<SmallVec<[u32; MAX_GLYPH_COUNT]>>;

#[derive(Debug, Clone)]
struct VariableDomain {
    length: usize,
    words: BitSet,

    /// Count of the domain words placing each glyph in each cell, so that support checks
    /// during propagation are O(1) per candidate. Only words whose length matches the slot
    /// are counted; node consistency removes the rest before propagation starts.
    glyph_counts: GlyphCountsByCell,
}

/// Per-variable candidate-word sets. Owned and cheaply cloneable, so the search can restrict
/// a snapshot hypothetically without disturbing the parent branch.
#[derive(Debug, Clone)]
pub struct DomainStore {
    domains: Vec<VariableDomain>,
}

impl DomainStore {
    /// Initialize every variable's domain to the full vocabulary.
    pub fn new(model: &GridModel, vocab: &Vocabulary) -> DomainStore {
        let domains = model
            .variables
            .iter()
            .map(|variable| {
                let mut words = BitSet::with_capacity(vocab.word_count());
                for word_id in 0..vocab.word_count() {
                    words.insert(word_id);
                }

                let mut glyph_counts: GlyphCountsByCell = (0..variable.length)
                    .map(|_| smallvec![0; vocab.glyph_count()])
                    .collect();

                for word in &vocab.words {
                    if word.glyphs.len() != variable.length {
                        continue;
                    }
                    for (cell_idx, &glyph) in word.glyphs.iter().enumerate() {
                        glyph_counts[cell_idx][glyph] += 1;
                    }
                }

                VariableDomain {
                    length: variable.length,
                    words,
                    glyph_counts,
                }
            })
            .collect();

        DomainStore { domains }
    }

    /// How many candidates remain for this variable?
    pub fn remaining(&self, variable: VariableId) -> usize {
        self.domains[variable].words.len()
    }

    pub fn contains(&self, variable: VariableId, word_id: WordId) -> bool {
        self.domains[variable].words.contains(word_id)
    }

    pub fn iter(&self, variable: VariableId) -> impl Iterator<Item = WordId> + '_ {
        self.domains[variable].words.iter()
    }

    /// Remove a candidate, keeping the glyph counts in sync. Returns false if the word was
    /// not in the domain.
    pub fn remove(&mut self, variable: VariableId, word_id: WordId, vocab: &Vocabulary) -> bool {
        let domain = &mut self.domains[variable];
        if !domain.words.remove(word_id) {
            return false;
        }

        let word = vocab.word(word_id);
        if word.glyphs.len() == domain.length {
            for (cell_idx, &glyph) in word.glyphs.iter().enumerate() {
                domain.glyph_counts[cell_idx][glyph] -= 1;
            }
        }
        true
    }

    /// Shrink a domain to a single trial word.
    pub fn restrict_to(&mut self, variable: VariableId, word_id: WordId, vocab: &Vocabulary) {
        let discarded: Vec<WordId> = self.iter(variable).filter(|&w| w != word_id).collect();
        for w in discarded {
            self.remove(variable, w, vocab);
        }
    }

    fn supporting(&self, variable: VariableId, cell_idx: usize, glyph: GlyphId) -> u32 {
        self.domains[variable].glyph_counts[cell_idx][glyph]
    }
}

/// Remove every candidate whose length differs from its variable's length. Idempotent, and
/// the only unary constraint in this problem.
pub fn enforce_node_consistency(domains: &mut DomainStore, model: &GridModel, vocab: &Vocabulary) {
    for variable in &model.variables {
        let mismatched: Vec<WordId> = domains
            .iter(variable.id)
            .filter(|&word_id| vocab.word(word_id).glyphs.len() != variable.length)
            .collect();

        for word_id in mismatched {
            domains.remove(variable.id, word_id, vocab);
        }
    }
}

/// Make `x` arc consistent with `y` by removing candidates of `x` with no supporting
/// candidate in `y`'s domain at the overlap cell. Only `x`'s domain is mutated.
fn revise(
    domains: &mut DomainStore,
    model: &GridModel,
    vocab: &Vocabulary,
    x: VariableId,
    y: VariableId,
) -> bool {
    let mut revised = false;

    for crossing in &model.variables[x].crossings {
        if crossing.other != y {
            continue;
        }

        let unsupported: Vec<WordId> = domains
            .iter(x)
            .filter(|&word_id| match vocab.word(word_id).glyphs.get(crossing.cell) {
                Some(&glyph) => domains.supporting(y, crossing.other_cell, glyph) == 0,
                None => true,
            })
            .collect();

        if !unsupported.is_empty() {
            trace!(x, y, removed = unsupported.len(), "revised arc");
        }
        for word_id in unsupported {
            domains.remove(x, word_id, vocab);
            revised = true;
        }
    }

    revised
}

/// AC-3 over the crossing graph. With no initial arcs, the work stack is seeded with every
/// ordered neighbor pair in both directions. Returns false the moment any domain empties,
/// without draining the rest of the stack; returns true once the stack empties with all
/// domains non-empty.
pub fn enforce_arc_consistency(
    domains: &mut DomainStore,
    model: &GridModel,
    vocab: &Vocabulary,
    initial_arcs: Option<&[(VariableId, VariableId)]>,
) -> bool {
    if model.variables.iter().any(|v| domains.remaining(v.id) == 0) {
        return false;
    }

    let mut stack: Vec<(VariableId, VariableId)> = match initial_arcs {
        Some(arcs) => arcs.to_vec(),
        None => model
            .variables
            .iter()
            .flat_map(|variable| {
                variable
                    .crossings
                    .iter()
                    .map(move |crossing| (variable.id, crossing.other))
            })
            .collect(),
    };

    while let Some((x, y)) = stack.pop() {
        if revise(domains, model, vocab, x, y) {
            if domains.remaining(x) == 0 {
                debug!(variable = x, "arc consistency emptied a domain");
                return false;
            }

            // x shrank, so every other neighbor needs rechecking against it. Re-enqueueing
            // (x, y) itself is never necessary and would threaten termination.
            for crossing in &model.variables[x].crossings {
                if crossing.other != y {
                    stack.push((crossing.other, x));
                }
            }
        }
    }

    true
}

/// Search limits and optional in-search propagation. The defaults run an unbounded search
/// with arc-consistency lookahead after every trial binding.
#[derive(Debug, Clone)]
pub struct FillConfig {
    pub propagate: bool,
    pub step_limit: Option<u64>,
    pub time_limit: Option<Duration>,
}

impl Default for FillConfig {
    fn default() -> FillConfig {
        FillConfig {
            propagate: true,
            step_limit: None,
            time_limit: None,
        }
    }
}

/// A slot assignment made during the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Choice {
    pub variable: VariableId,
    pub word: WordId,
}

/// Counters describing a completed search.
#[derive(Debug, Clone)]
pub struct Statistics {
    pub states: u64,
    pub backtracks: u64,
    pub duration: Duration,
}

/// A complete, consistent assignment plus search statistics.
#[derive(Debug)]
pub struct FillSuccess {
    pub statistics: Statistics,
    pub assignment: Vec<Choice>,
}

/// Why no assignment was produced. `Unsolvable` is a proof that no fill exists;
/// `BudgetExhausted` only means the configured limits ran out first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillFailure {
    Unsolvable,
    BudgetExhausted,
}

enum SearchOutcome {
    Solved,
    Exhausted,
    Aborted,
}

struct Search<'a> {
    model: &'a GridModel,
    vocab: &'a Vocabulary,
    config: &'a FillConfig,
    start: Instant,
    statistics: Statistics,
    choices: Vec<Choice>,
    assigned: Vec<Option<WordId>>,
    used_words: BitSet,
}

impl<'a> Search<'a> {
    fn over_budget(&self) -> bool {
        if let Some(limit) = self.config.step_limit {
            if self.statistics.states >= limit {
                return true;
            }
        }
        if let Some(limit) = self.config.time_limit {
            if self.start.elapsed() >= limit {
                return true;
            }
        }
        false
    }

    /// Minimum-remaining-values selection: smallest domain net of words already used
    /// elsewhere, ties broken by maximum degree, then by lowest id for reproducibility.
    fn select_unassigned(&self, domains: &DomainStore) -> Option<VariableId> {
        self.model
            .variables
            .iter()
            .filter(|variable| self.assigned[variable.id].is_none())
            .min_by_key(|variable| {
                // Tallied by hand: `Iterator::count` trusts `size_hint`, and bit-set's
                // iterator reports an upper bound that undercounts multi-member blocks.
                let remaining = domains
                    .iter(variable.id)
                    .filter(|&word_id| !self.used_words.contains(word_id))
                    .fold(0usize, |n, _| n + 1);
                (remaining, Reverse(variable.crossings.len()), variable.id)
            })
            .map(|variable| variable.id)
    }

    /// Least-constraining-value ordering: candidates sorted ascending by how many values
    /// they rule out across the domains of unassigned neighbors, ties broken by word id.
    /// Words already used by other slots are excluded outright.
    fn order_candidates(&self, variable: VariableId, domains: &DomainStore) -> Vec<WordId> {
        let var = &self.model.variables[variable];

        let mut ranked: Vec<(usize, WordId)> = domains
            .iter(variable)
            .filter(|&word_id| !self.used_words.contains(word_id))
            .map(|word_id| {
                let word = self.vocab.word(word_id);
                let ruled_out: usize = var
                    .crossings
                    .iter()
                    .filter(|crossing| self.assigned[crossing.other].is_none())
                    .map(|crossing| {
                        let glyph = word.glyphs[crossing.cell];
                        let supported =
                            domains.supporting(crossing.other, crossing.other_cell, glyph) as usize;
                        domains.remaining(crossing.other).saturating_sub(supported)
                    })
                    .sum();
                (ruled_out, word_id)
            })
            .collect();

        ranked.sort_unstable();
        ranked.into_iter().map(|(_, word_id)| word_id).collect()
    }

    /// Incremental consistency check for a trial binding: the word must be unused anywhere
    /// in the assignment and must agree with every already-bound crossing at the shared
    /// cell. Earlier levels already validated the rest of the assignment pairwise.
    fn choice_is_consistent(&self, variable: VariableId, word_id: WordId) -> bool {
        if self.used_words.contains(word_id) {
            return false;
        }

        let variable = &self.model.variables[variable];
        let glyphs = &self.vocab.word(word_id).glyphs;
        if glyphs.len() != variable.length {
            return false;
        }

        variable.crossings.iter().all(|crossing| {
            match self.assigned[crossing.other] {
                Some(bound) => {
                    self.vocab.word(bound).glyphs[crossing.other_cell] == glyphs[crossing.cell]
                }
                None => true,
            }
        })
    }

    fn bind(&mut self, variable: VariableId, word_id: WordId) {
        self.assigned[variable] = Some(word_id);
        self.used_words.insert(word_id);
        self.choices.push(Choice {
            variable,
            word: word_id,
        });
    }

    fn unbind(&mut self, variable: VariableId, word_id: WordId) {
        self.assigned[variable] = None;
        self.used_words.remove(word_id);
        self.choices.pop();
    }

    fn backtrack(&mut self, domains: &DomainStore) -> SearchOutcome {
        let variable = match self.select_unassigned(domains) {
            Some(variable) => variable,
            None => return SearchOutcome::Solved,
        };
        if self.over_budget() {
            return SearchOutcome::Aborted;
        }
        self.statistics.states += 1;

        for word_id in self.order_candidates(variable, domains) {
            if !self.choice_is_consistent(variable, word_id) {
                continue;
            }
            self.bind(variable, word_id);

            // Hypothetical restriction on a snapshot: the parent branch's domains stay
            // untouched, so backtracking is a plain drop of the child store.
            let mut child = domains.clone();
            child.restrict_to(variable, word_id, self.vocab);

            let viable = if self.config.propagate {
                let arcs: Vec<(VariableId, VariableId)> = self.model.variables[variable]
                    .crossings
                    .iter()
                    .filter(|crossing| self.assigned[crossing.other].is_none())
                    .map(|crossing| (crossing.other, variable))
                    .collect();
                enforce_arc_consistency(&mut child, self.model, self.vocab, Some(&arcs))
            } else {
                true
            };

            if viable {
                match self.backtrack(&child) {
                    SearchOutcome::Exhausted => {}
                    done => return done,
                }
            }

            self.unbind(variable, word_id);
            self.statistics.backtracks += 1;
        }

        SearchOutcome::Exhausted
    }
}

/// Fill the grid with the given search configuration. Runs node consistency and a global
/// arc-consistency pass before searching; an empty domain at that point is already a proof
/// that no fill exists, so the search never starts.
pub fn solve_with_config(
    model: &GridModel,
    vocab: &Vocabulary,
    config: &FillConfig,
) -> Result<FillSuccess, FillFailure> {
    let start = Instant::now();
    debug!(
        variables = model.variable_count(),
        words = vocab.word_count(),
        "starting fill"
    );

    let mut domains = DomainStore::new(model, vocab);
    enforce_node_consistency(&mut domains, model, vocab);

    if !enforce_arc_consistency(&mut domains, model, vocab, None) {
        debug!("unsolvable before search");
        return Err(FillFailure::Unsolvable);
    }

    let mut search = Search {
        model,
        vocab,
        config,
        start,
        statistics: Statistics {
            states: 0,
            backtracks: 0,
            duration: Duration::from_millis(0),
        },
        choices: vec![],
        assigned: vec![None; model.variable_count()],
        used_words: BitSet::with_capacity(vocab.word_count()),
    };

    match search.backtrack(&domains) {
        SearchOutcome::Solved => {
            search.statistics.duration = start.elapsed();
            debug!(
                states = search.statistics.states,
                backtracks = search.statistics.backtracks,
                "fill complete"
            );
            Ok(FillSuccess {
                statistics: search.statistics,
                assignment: search.choices,
            })
        }
        SearchOutcome::Exhausted => {
            debug!(states = search.statistics.states, "search exhausted");
            Err(FillFailure::Unsolvable)
        }
        SearchOutcome::Aborted => {
            debug!(states = search.statistics.states, "budget exhausted");
            Err(FillFailure::BudgetExhausted)
        }
    }
}

/// Fill the grid with the default configuration: unbounded search with lookahead.
pub fn solve(model: &GridModel, vocab: &Vocabulary) -> Result<FillSuccess, FillFailure> {
    solve_with_config(model, vocab, &FillConfig::default())
}

/// Turn the given model and assignment into a rendered string, with `#` for blocks and `.`
/// for open cells no choice covers.
pub fn render_grid(model: &GridModel, assignment: &[Choice], vocab: &Vocabulary) -> String {
    let mut height = 0;
    let mut width = 0;
    for variable in &model.variables {
        let (last_row, last_col) = variable.cell(variable.length - 1);
        height = height.max(last_row + 1);
        width = width.max(last_col + 1);
    }

    let mut rows: Vec<Vec<char>> = (0..height).map(|_| vec!['#'; width]).collect();

    for variable in &model.variables {
        for cell_idx in 0..variable.length {
            let (row, col) = variable.cell(cell_idx);
            rows[row][col] = '.';
        }
    }

    for &Choice { variable, word } in assignment {
        let variable = &model.variables[variable];
        let word = vocab.word(word);
        for (cell_idx, &glyph) in word.glyphs.iter().enumerate() {
            let (row, col) = variable.cell(cell_idx);
            rows[row][col] = vocab.glyphs[glyph];
        }
    }

    rows.into_iter()
        .map(|row| row.into_iter().collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
