use crate::model::{FitError, SelectionError};
use serde::{Deserialize, Serialize};
use statrs::distribution::{ChiSquared, ContinuousCDF};
use std::fmt;
use tracing::{debug, info};

/// Non-seasonal `(p, d, q)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Order {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

/// Seasonal `(P, D, Q)`; the period lives on the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeasonalOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

impl SeasonalOrder {
    pub const NONE: SeasonalOrder = SeasonalOrder { p: 0, d: 0, q: 0 };

    pub fn is_none(&self) -> bool {
        *self == Self::NONE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModelKind {
    Arma,
    Arima,
    Sarima,
}

impl ModelKind {
    pub fn classify(order: Order, seasonal: SeasonalOrder) -> Self {
        match (order.d, seasonal.is_none()) {
            (0, true) => ModelKind::Arma,
            (_, true) => ModelKind::Arima,
            _ => ModelKind::Sarima,
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ModelKind::Arma => "ARMA",
            ModelKind::Arima => "ARIMA",
            ModelKind::Sarima => "SARIMA",
        };
        f.write_str(s)
    }
}

/// What an external estimator reports back for one fitted model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitSummary {
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
}

/// Seam to the statistics library that does the actual estimation.
pub trait ModelFitter {
    fn fit(
        &self,
        values: &[f64],
        order: Order,
        seasonal: SeasonalOrder,
        period: usize,
    ) -> Result<FitSummary, FitError>;
}

/// Orders to try. Every `d` is combined with every `(p, q)` up to the
/// maxima and with every seasonal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateGrid {
    pub max_p: usize,
    pub max_q: usize,
    pub d_values: Vec<usize>,
    pub seasonal_orders: Vec<SeasonalOrder>,
    /// Seasonal period; 5 is one trading week.
    pub period: usize,
}

impl Default for CandidateGrid {
    fn default() -> Self {
        Self {
            max_p: 4,
            max_q: 4,
            d_values: vec![0, 1],
            seasonal_orders: vec![
                SeasonalOrder::NONE,
                SeasonalOrder { p: 1, d: 0, q: 0 },
                SeasonalOrder { p: 0, d: 0, q: 1 },
                SeasonalOrder { p: 1, d: 0, q: 1 },
            ],
            period: 5,
        }
    }
}

impl CandidateGrid {
    pub fn candidates(&self) -> Vec<(Order, SeasonalOrder)> {
        let mut out = Vec::new();
        for &d in &self.d_values {
            for p in 0..=self.max_p {
                for q in 0..=self.max_q {
                    for &seasonal in &self.seasonal_orders {
                        out.push((Order { p, d, q }, seasonal));
                    }
                }
            }
        }
        out
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedModel {
    pub rank: usize,
    pub order: Order,
    pub seasonal: SeasonalOrder,
    pub period: usize,
    pub kind: ModelKind,
    pub aic: f64,
    pub bic: f64,
    pub log_likelihood: f64,
}

impl RankedModel {
    /// e.g. `SARIMA (1,1,0) (1,0,1)[5]`
    pub fn label(&self) -> String {
        let mut label = format!("{} ({},{},{})", self.kind, self.order.p, self.order.d, self.order.q);
        if !self.seasonal.is_none() {
            label.push_str(&format!(
                " ({},{},{})[{}]",
                self.seasonal.p, self.seasonal.d, self.seasonal.q, self.period
            ));
        }
        label
    }
}

/// Likelihood-ratio test of the best model against the runner-up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LikelihoodRatio {
    pub statistic: f64,
    pub degrees_of_freedom: usize,
    /// Upper tail of the chi-square distribution at `statistic`.
    pub p_value: f64,
}

/// Ranked candidates; only `select_model` builds one, so the table is never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelSelection {
    table: Vec<RankedModel>,
    best_bic: usize,
    lrt: Option<LikelihoodRatio>,
}

impl ModelSelection {
    /// Sorted by AIC, rank 1 first.
    pub fn table(&self) -> &[RankedModel] {
        &self.table
    }

    pub fn best(&self) -> &RankedModel {
        &self.table[0]
    }

    pub fn best_by_bic(&self) -> &RankedModel {
        &self.table[self.best_bic]
    }

    pub fn lrt(&self) -> Option<&LikelihoodRatio> {
        self.lrt.as_ref()
    }
}

/// Fits every candidate of `grid`, skipping the ones that fail, and ranks
/// the survivors by AIC (ties by BIC, then grid order).
pub fn select_model<F: ModelFitter + ?Sized>(
    name: &str,
    values: &[f64],
    grid: &CandidateGrid,
    fitter: &F,
) -> Result<ModelSelection, SelectionError> {
    let mut table = Vec::new();
    for (order, seasonal) in grid.candidates() {
        match fitter.fit(values, order, seasonal, grid.period) {
            Ok(summary) => table.push(RankedModel {
                rank: 0,
                order,
                seasonal,
                period: grid.period,
                kind: ModelKind::classify(order, seasonal),
                aic: summary.aic,
                bic: summary.bic,
                log_likelihood: summary.log_likelihood,
            }),
            Err(e) => debug!("{}: skipping {:?} {:?}: {}", name, order, seasonal, e),
        }
    }
    if table.is_empty() {
        return Err(SelectionError::NoConvergence(name.to_string()));
    }

    table.sort_by(|a, b| a.aic.total_cmp(&b.aic).then(a.bic.total_cmp(&b.bic)));
    for (idx, model) in table.iter_mut().enumerate() {
        model.rank = idx + 1;
    }

    let best_bic = table
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| a.bic.total_cmp(&b.bic))
        .map(|(idx, _)| idx)
        .unwrap_or(0);

    let lrt = table.get(1).and_then(|second| likelihood_ratio(&table[0], second));

    let selection = ModelSelection { table, best_bic, lrt };
    info!(
        "{}: best by AIC {} (AIC={:.2}, BIC={:.2})",
        name,
        selection.best().label(),
        selection.best().aic,
        selection.best().bic
    );
    if let Some(lr) = selection.lrt() {
        info!(
            "{}: LR test vs runner-up: LR={:.3}, df={}, p={:.4}",
            name, lr.statistic, lr.degrees_of_freedom, lr.p_value
        );
    }
    Ok(selection)
}

/// `2 (llf_best - llf_second)` when the best model has more AR/MA terms,
/// with `p = 1 - chi2.cdf(lr, df)`.
fn likelihood_ratio(best: &RankedModel, second: &RankedModel) -> Option<LikelihoodRatio> {
    let terms = |m: &RankedModel| (m.order.p + m.order.q + m.seasonal.p + m.seasonal.q) as i64;
    let df = terms(best) - terms(second);
    if df <= 0 {
        return None;
    }
    let statistic = 2.0 * (best.log_likelihood - second.log_likelihood);
    let chi2 = ChiSquared::new(df as f64).ok()?;
    Some(LikelihoodRatio {
        statistic,
        degrees_of_freedom: df as usize,
        p_value: 1.0 - chi2.cdf(statistic),
    })
}
