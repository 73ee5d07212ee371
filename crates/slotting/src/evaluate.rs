use crate::fees::FeeTable;
use serde::{Deserialize, Serialize};
use shelfwise_sheet::position_label;

/// Expected profit of placing a product in one cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SlotScore {
    /// Row-major cell index
    pub index: usize,
    pub row: usize,
    pub col: usize,
    pub position: String,
    pub fee: f64,
    pub profit: f64,
}

/// Scores for every cell plus the most profitable one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridEvaluation {
    pub slots: Vec<SlotScore>,
    /// Index of the first cell with the highest positive profit
    pub best: Option<usize>,
    /// Highest profit seen, or 0 when no cell is profitable
    pub max_profit: f64,
}

impl GridEvaluation {
    /// The winning slot, if any cell turns a profit
    #[must_use]
    pub fn best_slot(&self) -> Option<&SlotScore> {
        self.best.and_then(|i| self.slots.get(i))
    }

    /// Up to `n` slots, most profitable first. Equal profits keep grid order.
    #[must_use]
    pub fn top_slots(&self, n: usize) -> Vec<&SlotScore> {
        let mut ranked: Vec<&SlotScore> = self.slots.iter().collect();
        ranked.sort_by(|a, b| b.profit.total_cmp(&a.profit));
        ranked.truncate(n);
        ranked
    }

    /// Slots with a strictly positive profit, in grid order
    pub fn profitable(&self) -> impl Iterator<Item = &SlotScore> {
        self.slots.iter().filter(|s| s.profit > 0.0)
    }
}

/// Score every cell of `fees` for a product with the given unit price and
/// margin.
///
/// Profit is `price * margin - fee`. The best cell is the first whose profit
/// strictly beats every earlier one and zero, so ties go to the earlier cell
/// and a grid where nothing is profitable has no best cell.
#[must_use]
pub fn evaluate(price: f64, margin: f64, fees: &FeeTable) -> GridEvaluation {
    let expected = price * margin;
    let mut max_profit = 0.0;
    let mut best = None;

    let slots: Vec<SlotScore> = fees
        .cells()
        .enumerate()
        .map(|(index, (row, col, fee))| {
            let profit = expected - fee;
            if profit > max_profit {
                max_profit = profit;
                best = Some(index);
            }
            SlotScore {
                index,
                row,
                col,
                position: position_label(row, col),
                fee,
                profit,
            }
        })
        .collect();

    match best {
        Some(i) => tracing::debug!(
            "best slot {} with profit {:.2}",
            slots[i].position,
            max_profit
        ),
        None => tracing::debug!("no profitable slot for price {} margin {}", price, margin),
    }

    GridEvaluation {
        slots,
        best,
        max_profit,
    }
}
