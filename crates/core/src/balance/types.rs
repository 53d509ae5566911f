//! Account tree and balance data types.
//!
//! Field names follow the French wire format used by the balance screens
//! (`soldeDebiteurAN`, `mouvementsDebit`, ...), while the Rust names stay
//! in English.

use std::fmt;
use std::ops::AddAssign;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// SYSCOHADA account class, taken from the first digit of an account code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountClass {
    /// Class 1 - Comptes de ressources durables.
    DurableResources,
    /// Class 2 - Comptes d'actif immobilisé.
    FixedAssets,
    /// Class 3 - Comptes de stocks.
    Inventory,
    /// Class 4 - Comptes de tiers.
    ThirdParties,
    /// Class 5 - Comptes de trésorerie.
    Treasury,
    /// Class 6 - Comptes de charges des activités ordinaires.
    Expenses,
    /// Class 7 - Comptes de produits des activités ordinaires.
    Revenues,
    /// Class 8 - Comptes des autres charges et des autres produits (HAO).
    OtherItems,
    /// Class 9 - Engagements hors bilan et comptabilité analytique.
    Commitments,
}

/// Side on which an account class normally carries its balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalSide {
    /// Debit-normal (assets, expenses).
    Debit,
    /// Credit-normal (resources, revenues).
    Credit,
    /// Either side depending on the sub-account (third parties, HAO).
    Mixed,
}

impl AccountClass {
    /// Resolves the class from an account code such as `"411000"`.
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim_start().chars().next()? {
            '1' => Some(Self::DurableResources),
            '2' => Some(Self::FixedAssets),
            '3' => Some(Self::Inventory),
            '4' => Some(Self::ThirdParties),
            '5' => Some(Self::Treasury),
            '6' => Some(Self::Expenses),
            '7' => Some(Self::Revenues),
            '8' => Some(Self::OtherItems),
            '9' => Some(Self::Commitments),
            _ => None,
        }
    }

    /// The class digit.
    #[must_use]
    pub const fn digit(self) -> u8 {
        match self {
            Self::DurableResources => 1,
            Self::FixedAssets => 2,
            Self::Inventory => 3,
            Self::ThirdParties => 4,
            Self::Treasury => 5,
            Self::Expenses => 6,
            Self::Revenues => 7,
            Self::OtherItems => 8,
            Self::Commitments => 9,
        }
    }

    /// French label as printed on the chart of accounts.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::DurableResources => "Comptes de ressources durables",
            Self::FixedAssets => "Comptes d'actif immobilisé",
            Self::Inventory => "Comptes de stocks",
            Self::ThirdParties => "Comptes de tiers",
            Self::Treasury => "Comptes de trésorerie",
            Self::Expenses => "Comptes de charges des activités ordinaires",
            Self::Revenues => "Comptes de produits des activités ordinaires",
            Self::OtherItems => "Comptes des autres charges et des autres produits",
            Self::Commitments => "Comptes des engagements hors bilan et analytique",
        }
    }

    /// Normal balance side.
    #[must_use]
    pub const fn normal_side(self) -> NormalSide {
        match self {
            Self::FixedAssets | Self::Inventory | Self::Treasury | Self::Expenses => {
                NormalSide::Debit
            }
            Self::DurableResources | Self::Revenues => NormalSide::Credit,
            Self::ThirdParties | Self::OtherItems | Self::Commitments => NormalSide::Mixed,
        }
    }

    /// Classes 1 to 5 feed the balance sheet.
    #[must_use]
    pub const fn is_balance_sheet(self) -> bool {
        self.digit() <= 5
    }

    /// Classes whose variance reads "more is better" (revenues).
    #[must_use]
    pub const fn is_revenue(self) -> bool {
        matches!(self, Self::Revenues)
    }
}

impl fmt::Display for AccountClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Classe {}", self.digit())
    }
}

/// A node of the account tree with its six balance figures.
///
/// Parent figures are expected to equal the sum of their children. Nothing
/// enforces it at construction; see `BalanceService::rollup` and
/// `BalanceService::verify_rollup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceAccount {
    /// Account code (e.g. `"411100"`).
    pub code: String,
    /// Account label.
    #[serde(rename = "libelle")]
    pub label: String,
    /// Depth in the chart (1 = class).
    #[serde(rename = "niveau")]
    pub level: u8,
    /// Parent account code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<String>,
    /// Opening debit balance (à nouveau).
    #[serde(rename = "soldeDebiteurAN", default)]
    pub opening_debit: Decimal,
    /// Opening credit balance (à nouveau).
    #[serde(rename = "soldeCrediteurAN", default)]
    pub opening_credit: Decimal,
    /// Debit movements of the period.
    #[serde(rename = "mouvementsDebit", default)]
    pub movement_debit: Decimal,
    /// Credit movements of the period.
    #[serde(rename = "mouvementsCredit", default)]
    pub movement_credit: Decimal,
    /// Closing debit balance.
    #[serde(rename = "soldeDebiteur", default)]
    pub closing_debit: Decimal,
    /// Closing credit balance.
    #[serde(rename = "soldeCrediteur", default)]
    pub closing_credit: Decimal,
    /// Sub-accounts. Empty for a leaf.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<BalanceAccount>,
}

impl BalanceAccount {
    /// Creates an account with zero figures and no children.
    #[must_use]
    pub fn new(code: impl Into<String>, label: impl Into<String>, level: u8) -> Self {
        Self {
            code: code.into(),
            label: label.into(),
            level,
            parent: None,
            opening_debit: Decimal::ZERO,
            opening_credit: Decimal::ZERO,
            movement_debit: Decimal::ZERO,
            movement_credit: Decimal::ZERO,
            closing_debit: Decimal::ZERO,
            closing_credit: Decimal::ZERO,
            children: Vec::new(),
        }
    }

    /// Sets the parent code.
    #[must_use]
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Sets the opening balances.
    #[must_use]
    pub fn with_opening(mut self, debit: Decimal, credit: Decimal) -> Self {
        self.opening_debit = debit;
        self.opening_credit = credit;
        self
    }

    /// Sets the period movements.
    #[must_use]
    pub fn with_movements(mut self, debit: Decimal, credit: Decimal) -> Self {
        self.movement_debit = debit;
        self.movement_credit = credit;
        self
    }

    /// Sets the closing balances.
    #[must_use]
    pub fn with_closing(mut self, debit: Decimal, credit: Decimal) -> Self {
        self.closing_debit = debit;
        self.closing_credit = credit;
        self
    }

    /// Sets the children, stamping their `parent` with this account's code.
    #[must_use]
    pub fn with_children(mut self, children: Vec<BalanceAccount>) -> Self {
        self.children = children
            .into_iter()
            .map(|mut child| {
                child.parent = Some(self.code.clone());
                child
            })
            .collect();
        self
    }

    /// Derives the closing balances from opening balances and movements.
    ///
    /// A net debit position lands in `closing_debit`, a net credit position
    /// in `closing_credit`; the other side is zero.
    #[must_use]
    pub fn with_closing_from_movements(mut self) -> Self {
        let net = (self.opening_debit - self.opening_credit)
            + (self.movement_debit - self.movement_credit);
        if net < Decimal::ZERO {
            self.closing_debit = Decimal::ZERO;
            self.closing_credit = -net;
        } else {
            self.closing_debit = net;
            self.closing_credit = Decimal::ZERO;
        }
        self
    }

    /// An account with an empty `children` list is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// SYSCOHADA class of the account.
    #[must_use]
    pub fn class(&self) -> Option<AccountClass> {
        AccountClass::from_code(&self.code)
    }

    /// The six figures of this node alone, ignoring its children.
    #[must_use]
    pub fn figures(&self) -> BalanceTotals {
        BalanceTotals {
            opening_debit: self.opening_debit,
            opening_credit: self.opening_credit,
            movement_debit: self.movement_debit,
            movement_credit: self.movement_credit,
            closing_debit: self.closing_debit,
            closing_credit: self.closing_credit,
        }
    }

    /// Overwrites the six figures.
    pub fn set_figures(&mut self, figures: &BalanceTotals) {
        self.opening_debit = figures.opening_debit;
        self.opening_credit = figures.opening_credit;
        self.movement_debit = figures.movement_debit;
        self.movement_credit = figures.movement_credit;
        self.closing_debit = figures.closing_debit;
        self.closing_credit = figures.closing_credit;
    }

    /// True if all six figures are zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.figures() == BalanceTotals::default()
    }

    /// Depth-first search for an account by code, this node included.
    #[must_use]
    pub fn find(&self, code: &str) -> Option<&BalanceAccount> {
        if self.code == code {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(code))
    }
}

/// Flat six-field sum used for the totals row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceTotals {
    /// Total opening debit balances.
    #[serde(rename = "soldeDebiteurAN")]
    pub opening_debit: Decimal,
    /// Total opening credit balances.
    #[serde(rename = "soldeCrediteurAN")]
    pub opening_credit: Decimal,
    /// Total debit movements.
    #[serde(rename = "mouvementsDebit")]
    pub movement_debit: Decimal,
    /// Total credit movements.
    #[serde(rename = "mouvementsCredit")]
    pub movement_credit: Decimal,
    /// Total closing debit balances.
    #[serde(rename = "soldeDebiteur")]
    pub closing_debit: Decimal,
    /// Total closing credit balances.
    #[serde(rename = "soldeCrediteur")]
    pub closing_credit: Decimal,
}

impl BalanceTotals {
    /// Closing debit minus closing credit.
    #[must_use]
    pub fn closing_difference(&self) -> Decimal {
        self.closing_debit - self.closing_credit
    }

    /// Opening debit minus opening credit.
    #[must_use]
    pub fn opening_difference(&self) -> Decimal {
        self.opening_debit - self.opening_credit
    }

    /// Debit movements minus credit movements.
    #[must_use]
    pub fn movement_difference(&self) -> Decimal {
        self.movement_debit - self.movement_credit
    }
}

impl AddAssign<&BalanceTotals> for BalanceTotals {
    fn add_assign(&mut self, rhs: &BalanceTotals) {
        self.opening_debit += rhs.opening_debit;
        self.opening_credit += rhs.opening_credit;
        self.movement_debit += rhs.movement_debit;
        self.movement_credit += rhs.movement_credit;
        self.closing_debit += rhs.closing_debit;
        self.closing_credit += rhs.closing_credit;
    }
}

impl<'a> std::iter::Sum<&'a BalanceTotals> for BalanceTotals {
    fn sum<I: Iterator<Item = &'a BalanceTotals>>(iter: I) -> Self {
        iter.fold(Self::default(), |mut acc, item| {
            acc += item;
            acc
        })
    }
}

/// How debit and credit totals are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "value")]
pub enum EquilibriumPolicy {
    /// Totals must be exactly equal.
    #[default]
    Strict,
    /// Totals may differ by at most the given amount.
    Tolerance(Decimal),
}

impl EquilibriumPolicy {
    /// Returns true if `difference` is acceptable under this policy.
    #[must_use]
    pub fn accepts(self, difference: Decimal) -> bool {
        match self {
            Self::Strict => difference.is_zero(),
            Self::Tolerance(tolerance) => difference.abs() <= tolerance.abs(),
        }
    }
}

/// Result of the equilibrium checks on a totals row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EquilibriumReport {
    /// Opening debits match opening credits.
    pub opening_balanced: bool,
    /// Debit movements match credit movements.
    pub movements_balanced: bool,
    /// Closing debits match closing credits.
    pub closing_balanced: bool,
    /// Closing debit minus closing credit.
    pub difference: Decimal,
    /// Headline flag, driven by the closing check.
    pub is_balanced: bool,
}

/// Parent whose stored figures disagree with the sum of its children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollupMismatch {
    /// Parent account code.
    pub code: String,
    /// Sum of the direct children's figures.
    pub expected: BalanceTotals,
    /// Figures stored on the parent.
    pub actual: BalanceTotals,
}
