use std::time::Duration;

use crate::error::ConfigError;

/// How a student removes a meal from the Counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ClaimMode {
    /// All three decrements and the queue bookkeeping happen in one
    /// Counter critical section.
    #[default]
    Locked,
    /// Each course is taken in its own short lock acquisition, separate from
    /// the queue bookkeeping. Peers can observe a half-claimed meal.
    /// Only meant for compatibility runs.
    Unlocked,
}

/// When a cook opens the meal-ready gate after placing a plate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReadyRule {
    /// Signal while the number of signalled-but-unclaimed meals is below
    /// `min(soup, main, dessert)` on the Counter.
    #[default]
    Outstanding,
    /// Signal while the gate's free permits are below
    /// `min(soup, dessert, dessert)`. Main course never bounds the ceiling.
    Literal,
}

impl ReadyRule {
    /// Upper bound on meals this rule considers available on `tray`.
    pub fn ceiling(self, tray: &crate::plate::Tray) -> i64 {
        match self {
            ReadyRule::Outstanding => tray.min(),
            ReadyRule::Literal => tray.soup.min(tray.dessert).min(tray.dessert),
        }
    }
}

/// Knobs that pick between protocol variants. Defaults give the corrected
/// protocol.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProtocolConfig {
    pub claim_mode: ClaimMode,
    pub ready_rule: ReadyRule,

    /// How long a student keeps a table seat. Zero releases it immediately.
    pub eat_duration: Duration,
}

/// Run parameters, immutable once the run starts.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RunConfig {
    /// Number of cook actors (N).
    pub cooks: usize,

    /// Number of student actors (M).
    pub students: usize,

    /// Seats in the table pool (T).
    pub tables: usize,

    /// Counter occupancy (S) above which cooks report a crowded counter.
    ///
    /// The counter is not capacity-bounded; this only drives a warning and
    /// the `threshold_warnings` counter.
    pub counter_threshold: usize,

    /// Meals every student eats before going home (L).
    pub rounds: usize,

    pub protocol: ProtocolConfig,
}

impl RunConfig {
    pub fn new(
        cooks: usize,
        students: usize,
        tables: usize,
        counter_threshold: usize,
        rounds: usize,
    ) -> Self {
        Self {
            cooks,
            students,
            tables,
            counter_threshold,
            rounds,
            protocol: ProtocolConfig::default(),
        }
    }

    pub fn with_protocol(mut self, protocol: ProtocolConfig) -> Self {
        self.protocol = protocol;
        self
    }

    /// Checks every constraint and reports all violations together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut violations = Vec::new();

        if self.cooks <= 2 {
            violations.push("N > 2");
        }
        if self.students <= self.cooks || self.students <= 2 {
            violations.push("M > N > 2");
        }
        if self.tables < 3 {
            violations.push("T >= 3");
        }
        if self.students <= self.tables {
            violations.push("M > T");
        }
        if self.counter_threshold <= 3 {
            violations.push("S > 3");
        }
        if self.rounds < 1 {
            violations.push("L >= 1");
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(ConfigError { violations })
        }
    }

    /// Plates the supplier delivers and cooks move: `3 * L * M`.
    pub fn production_target(&self) -> u64 {
        3 * self.rounds as u64 * self.students as u64
    }

    /// Meals eaten across all students: `L * M`.
    pub fn meals_needed(&self) -> u64 {
        self.rounds as u64 * self.students as u64
    }

    /// Kitchen slots the supplier may fill before a cook frees one: `2 * L * M + 1`.
    ///
    /// With `L * M` plates of each type in the input, a Kitchen holding this
    /// many plates always holds every type, so some waiting cook can proceed.
    pub fn kitchen_capacity(&self) -> usize {
        2 * self.rounds * self.students + 1
    }
}
