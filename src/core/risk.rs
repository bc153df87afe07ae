//! Portfolio risk tolerance from asset mix.
//!
//! Holdings arrive as plain data (symbol to current value); fetching them
//! from a brokerage is the caller's concern.

use std::collections::{BTreeMap, HashMap};
use std::io::Read;

use serde::Serialize;

use super::config::RISK_SCORING;
use super::error::RiskError;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
pub enum CapBucket {
    Large,
    Mid,
    Small,
}

impl CapBucket {
    fn score(self) -> f64 {
        match self {
            CapBucket::Large => RISK_SCORING.large_cap_score,
            CapBucket::Mid => RISK_SCORING.mid_cap_score,
            CapBucket::Small => RISK_SCORING.small_cap_score,
        }
    }
}

/// Listed symbols ranked by market capitalisation, largest first.
#[derive(Debug, Clone, Default)]
pub struct MarketCapUniverse {
    ranks: HashMap<String, usize>,
}

impl MarketCapUniverse {
    pub fn from_ranked<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ranks = HashMap::new();
        let listed = symbols
            .into_iter()
            .map(|s| s.as_ref().trim().to_uppercase())
            .filter(|s| !s.is_empty() && s != "NAN");
        for (rank, symbol) in listed.enumerate() {
            ranks.entry(symbol).or_insert(rank);
        }
        Self { ranks }
    }

    /// Reads ranked symbols from the first column of a CSV with a header row.
    pub fn from_csv<R: Read>(reader: R) -> Result<Self, csv::Error> {
        let mut rdr = csv::Reader::from_reader(reader);
        let mut symbols = Vec::new();
        for record in rdr.records() {
            let record = record?;
            if let Some(symbol) = record.get(0) {
                symbols.push(symbol.to_string());
            }
        }
        Ok(Self::from_ranked(symbols))
    }

    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    pub fn bucket(&self, symbol: &str) -> Option<CapBucket> {
        let rank = *self.ranks.get(&symbol.trim().to_uppercase())?;
        Some(if rank < RISK_SCORING.large_cap_ranks {
            CapBucket::Large
        } else if rank < RISK_SCORING.mid_cap_ranks {
            CapBucket::Mid
        } else {
            CapBucket::Small
        })
    }
}

/// How the equity side of the portfolio is known.
#[derive(Debug, Clone, PartialEq)]
pub enum StockExposure {
    /// Per-symbol current values.
    Holdings(BTreeMap<String, f64>),
    /// Only the total value is known.
    Total(f64),
}

impl StockExposure {
    fn value(&self) -> f64 {
        match self {
            StockExposure::Holdings(holdings) => holdings.values().sum(),
            StockExposure::Total(total) => *total,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PortfolioMix {
    pub fixed_deposits: f64,
    pub stocks: StockExposure,
    pub mutual_funds: f64,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum RiskCategory {
    Conservative,
    Moderate,
    Aggressive,
    NoInvestments,
    Unknown,
}

impl RiskCategory {
    pub fn label(self) -> &'static str {
        match self {
            RiskCategory::Conservative => "Conservative (Low Risk)",
            RiskCategory::Moderate => "Moderate",
            RiskCategory::Aggressive => "Aggressive (High Risk)",
            RiskCategory::NoInvestments => "No Investments",
            RiskCategory::Unknown => "Unknown",
        }
    }

    /// Buckets a score after rounding to two decimals; values in the gaps
    /// between buckets fall through to `Unknown`.
    pub fn from_score(score: f64) -> Self {
        let cents = (score * 100.0).round() as i64;
        match cents {
            100..=150 => RiskCategory::Conservative,
            151..=250 => RiskCategory::Moderate,
            251..=300 => RiskCategory::Aggressive,
            _ => RiskCategory::Unknown,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskAssessment {
    pub score: f64,
    pub category: RiskCategory,
    pub stock_value: f64,
    pub mutual_fund_value: f64,
    pub fixed_deposit_value: f64,
    pub total_value: f64,
}

pub fn market_cap_score(stocks: &StockExposure, universe: &MarketCapUniverse) -> f64 {
    match stocks {
        StockExposure::Total(_) => RISK_SCORING.unknown_allocation_score,
        StockExposure::Holdings(holdings) => {
            let total: f64 = holdings.values().sum();
            if total <= 0.0 {
                return 0.0;
            }
            holdings
                .iter()
                .filter_map(|(symbol, value)| universe.bucket(symbol).map(|b| b.score() * value))
                .sum::<f64>()
                / total
        }
    }
}

pub fn fixed_deposit_score(fd_value: f64, stock_value: f64) -> f64 {
    let total = fd_value + stock_value;
    if total <= 0.0 {
        return 0.0;
    }
    let safety_ratio = fd_value / total;
    if safety_ratio > 0.75 {
        1.0
    } else if safety_ratio >= 0.50 {
        1.5
    } else if safety_ratio >= 0.25 {
        2.0
    } else {
        3.0
    }
}

/// Mutual fund contribution, already weighted by its share of the portfolio.
pub fn mutual_fund_score(mf_value: f64, stock_value: f64, fd_value: f64) -> f64 {
    let total = mf_value + stock_value + fd_value;
    if total <= 0.0 {
        return 0.0;
    }
    RISK_SCORING.mutual_fund_score * mf_value / total
}

pub fn assess(
    mix: &PortfolioMix,
    universe: &MarketCapUniverse,
) -> Result<RiskAssessment, RiskError> {
    validate_mix(mix)?;

    let fd = mix.fixed_deposits;
    let mf = mix.mutual_funds;
    let stocks = mix.stocks.value();
    let total = fd + stocks + mf;

    if total <= 0.0 {
        return Ok(RiskAssessment {
            score: 0.0,
            category: RiskCategory::NoInvestments,
            stock_value: stocks,
            mutual_fund_value: mf,
            fixed_deposit_value: fd,
            total_value: total,
        });
    }

    let score = market_cap_score(&mix.stocks, universe) * (stocks / total)
        + fixed_deposit_score(fd, stocks) * (fd / total)
        + mutual_fund_score(mf, stocks, fd);

    Ok(RiskAssessment {
        score: (score * 100.0).round() / 100.0,
        category: RiskCategory::from_score(score),
        stock_value: stocks,
        mutual_fund_value: mf,
        fixed_deposit_value: fd,
        total_value: total,
    })
}

fn validate_mix(mix: &PortfolioMix) -> Result<(), RiskError> {
    let check = |value: f64, field: &str| {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(RiskError::InvalidAmount {
                field: field.to_string(),
            })
        }
    };
    check(mix.fixed_deposits, "fdValue")?;
    check(mix.mutual_funds, "mfValue")?;
    match &mix.stocks {
        StockExposure::Total(total) => check(*total, "stockValue")?,
        StockExposure::Holdings(holdings) => {
            for (symbol, value) in holdings {
                check(*value, &format!("holdings.{symbol}"))?;
            }
        }
    }
    Ok(())
}
