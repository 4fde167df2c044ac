use std::collections::BTreeMap;
use std::sync::Arc;

use crate::color::ColorScale;
use crate::data::filter::{eligible_count, evaluate, Evaluation, TempRange, ThresholdSet};
use crate::data::model::{CountyId, CountyRecord};
use crate::data::store::Store;
use crate::present::{self, TempUnit};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which end of a low/high pair a control moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Low,
    High,
}

/// Per-window UI state, independent of rendering.
///
/// The store is shared and read-only; everything else belongs to this
/// session alone.
pub struct AppState {
    pub store: Arc<Store>,

    /// Values currently set on the controls, not yet applied.
    pub pending: ThresholdSet,

    /// Thresholds behind `evaluation`.
    pub applied: ThresholdSet,

    /// Display value per county from the last "Update".
    pub evaluation: Evaluation,

    /// Unit for temperature labels.
    pub unit: TempUnit,

    pub color_scale: ColorScale,

    /// County under the pointer on the map.
    pub hovered: Option<CountyId>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,

    /// id → position in `store.records()`.
    index: BTreeMap<CountyId, usize>,
}

impl AppState {
    /// Fresh session showing the default thresholds.
    pub fn new(store: Arc<Store>) -> Self {
        let index = store
            .records()
            .iter()
            .enumerate()
            .map(|(i, r)| (r.id.clone(), i))
            .collect();
        let mut state = Self {
            store,
            pending: ThresholdSet::default(),
            applied: ThresholdSet::default(),
            evaluation: Evaluation::new(),
            unit: TempUnit::default(),
            color_scale: ColorScale::turbo(present::color_domain()),
            hovered: None,
            status_message: None,
            index,
        };
        state.apply();
        state
    }

    /// Recompute every county from the pending thresholds. The previous
    /// result is dropped.
    pub fn apply(&mut self) {
        self.applied = self.pending;
        self.evaluation = evaluate(self.store.records(), &self.applied);
        log::info!(
            "Applied {:?}: {} of {} counties match",
            self.applied,
            self.matching_count(),
            self.store.len()
        );
    }

    /// Flip between °F and °C labels. Results are untouched.
    pub fn toggle_unit(&mut self) {
        self.unit = self.unit.toggled();
        log::debug!("Temperature labels now in {}", self.unit.symbol());
    }

    pub fn set_max_price(&mut self, value: f64) {
        let (lo, hi) = (*present::PRICE_RANGE.start(), *present::PRICE_RANGE.end());
        self.pending.max_house_price = value.clamp(lo, hi);
    }

    pub fn set_monthly(&mut self, bound: Bound, value: f64) {
        move_bound(&mut self.pending.monthly_range, bound, value);
    }

    pub fn set_annual(&mut self, bound: Bound, value: f64) {
        move_bound(&mut self.pending.annual_range, bound, value);
    }

    /// Whether the controls differ from what the map shows.
    pub fn is_dirty(&self) -> bool {
        self.pending != self.applied
    }

    pub fn matching_count(&self) -> usize {
        eligible_count(&self.evaluation)
    }

    pub fn record(&self, id: &CountyId) -> Option<&CountyRecord> {
        self.index.get(id).map(|&i| &self.store.records()[i])
    }

    /// Matching counties, cheapest first.
    pub fn matches(&self) -> Vec<&CountyRecord> {
        let mut out: Vec<&CountyRecord> = self
            .store
            .records()
            .iter()
            .filter(|r| {
                self.evaluation
                    .get(&r.id)
                    .is_some_and(|v| v.is_eligible())
            })
            .collect();
        out.sort_by(|a, b| {
            a.house_price
                .total_cmp(&b.house_price)
                .then_with(|| a.id.cmp(&b.id))
        });
        out
    }
}

/// Move one end of a pair, pushing the other end so that low ≤ high.
fn move_bound(range: &mut TempRange, bound: Bound, value: f64) {
    let value = value.clamp(*present::TEMP_RANGE.start(), *present::TEMP_RANGE.end());
    match bound {
        Bound::Low => {
            range.low = value;
            range.high = range.high.max(value);
        }
        Bound::High => {
            range.high = value;
            range.low = range.low.min(value);
        }
    }
}
