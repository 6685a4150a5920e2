//! Earnings report printed by the binary

use anyhow::Result;
use owo_colors::OwoColorize;
use rust_decimal::Decimal;
use stake_economics::{AccountId, CalculationPeriod, ReturnType, RewardCalculatorEngine};

/// One line of the report
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    pub title: String,
    pub earnings: Decimal,
    /// Normalized return in percent
    pub percent: Decimal,
}

pub struct Report<'a> {
    engine: &'a dyn RewardCalculatorEngine,
    amount: Decimal,
    is_compound: bool,
    period: CalculationPeriod,
}

/// Fraction to percent, two decimal places
pub fn to_percent(fraction: Decimal) -> Decimal {
    (fraction * Decimal::ONE_HUNDRED).round_dp(2)
}

impl<'a> Report<'a> {
    pub fn new(
        engine: &'a dyn RewardCalculatorEngine,
        amount: Decimal,
        is_compound: bool,
        period: CalculationPeriod,
    ) -> Self {
        Self {
            engine,
            amount,
            is_compound,
            period,
        }
    }

    pub fn avg(&self, locale: &str) -> ReportLine {
        ReportLine {
            title: self.engine.avg_earning_title(locale),
            earnings: self
                .engine
                .calculate_avg_earnings(self.amount, self.is_compound, self.period),
            percent: to_percent(self.engine.calculator_return(
                self.is_compound,
                self.period,
                ReturnType::Avg,
            )),
        }
    }

    pub fn max(&self, locale: &str) -> ReportLine {
        ReportLine {
            title: self.engine.max_earnings_title(locale),
            earnings: self
                .engine
                .calculate_max_earnings(self.amount, self.is_compound, self.period),
            percent: to_percent(self.engine.calculator_return(
                self.is_compound,
                self.period,
                ReturnType::Max(None),
            )),
        }
    }

    pub fn validator(&self, account_id: &AccountId) -> Result<ReportLine> {
        let earnings = self.engine.calculate_earnings(
            self.amount,
            account_id,
            self.is_compound,
            self.period,
        )?;

        Ok(ReportLine {
            title: account_id.to_hex(),
            earnings,
            percent: to_percent(self.engine.calculator_return(
                self.is_compound,
                self.period,
                ReturnType::Max(Some(*account_id)),
            )),
        })
    }

    pub fn print(&self, symbol: &str, locale: &str, validator: Option<&AccountId>) -> Result<()> {
        let mode = if self.is_compound { "compound" } else { "simple" };
        println!(
            "{}: {} {} over {} ({})",
            "Stake".yellow().bold(),
            self.amount,
            symbol,
            self.period,
            mode
        );
        println!();

        for line in [self.avg(locale), self.max(locale)] {
            print_line(&line, symbol);
        }

        if let Some(account_id) = validator {
            print_line(&self.validator(account_id)?, symbol);
        }

        println!();
        Ok(())
    }
}

fn print_line(line: &ReportLine, symbol: &str) {
    println!(
        "  {:<20} {} {}  {}",
        line.title.bright_white(),
        line.earnings.round_dp(6).to_string().green(),
        symbol,
        format!("{}%", line.percent).cyan()
    );
}
