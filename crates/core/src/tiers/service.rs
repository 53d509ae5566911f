//! Third-party service: CRUD, validation and receivable indicators.

use chrono::Utc;
use ohada_shared::types::{PageRequest, PageResponse, ThirdPartyId};
use rust_decimal::Decimal;
use tracing::info;

use super::error::TiersError;
use super::types::{
    CreateThirdPartyInput, ThirdParty, ThirdPartyFilter, ThirdPartyStatus, UpdateThirdPartyInput,
};
use crate::store::MemoryStore;

/// Client and supplier registry.
#[derive(Default)]
pub struct TiersService {
    parties: MemoryStore<ThirdPartyId, ThirdParty>,
}

impl TiersService {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a third party. The collective account defaults to `411` for
    /// clients and `401` for suppliers.
    ///
    /// # Errors
    ///
    /// Returns `Required` for a blank code or name, `InvalidEmail`,
    /// `InvalidAccount` for an account outside 40/41, `NegativeAmount` for a
    /// negative credit limit and `DuplicateCode`.
    pub fn create(&self, input: CreateThirdPartyInput) -> Result<ThirdParty, TiersError> {
        let code = required("code", &input.code)?;
        let name = required("name", &input.name)?;
        let email = input.email.map(validate_email).transpose()?;
        let account_code = match input.account_code {
            Some(account) => validate_account(account)?,
            None => input.kind.default_account().to_string(),
        };
        if input.credit_limit.is_some_and(|l| l < Decimal::ZERO) {
            return Err(TiersError::NegativeAmount);
        }
        if self.parties.any(|p| p.code.eq_ignore_ascii_case(&code)) {
            return Err(TiersError::DuplicateCode(code));
        }

        let now = Utc::now();
        let party = ThirdParty {
            id: ThirdPartyId::new(),
            code,
            name,
            kind: input.kind,
            email,
            phone: input.phone,
            address: input.address,
            account_code,
            payment_terms_days: input.payment_terms_days,
            credit_limit: input.credit_limit,
            outstanding: Decimal::ZERO,
            revenue: Decimal::ZERO,
            status: ThirdPartyStatus::Active,
            created_at: now,
            updated_at: now,
        };

        info!(third_party_id = %party.id, code = %party.code, "Third party created");
        self.parties.insert(party.id, party.clone());
        Ok(party)
    }

    /// Returns a third party.
    pub fn get(&self, id: ThirdPartyId) -> Result<ThirdParty, TiersError> {
        self.parties.get(&id).ok_or(TiersError::NotFound(id))
    }

    /// Lists third parties matching `filter`, ordered by code, one page at a time.
    #[must_use]
    pub fn list(&self, filter: &ThirdPartyFilter, page: &PageRequest) -> PageResponse<ThirdParty> {
        let mut parties = self.parties.filter(|p| filter.accepts(p));
        parties.sort_by(|a, b| a.code.cmp(&b.code));
        page.paginate(parties)
    }

    /// Applies a partial update.
    ///
    /// # Errors
    ///
    /// Same validation as [`Self::create`] for the fields present.
    pub fn update(&self, id: ThirdPartyId, input: UpdateThirdPartyInput) -> Result<ThirdParty, TiersError> {
        let name = input.name.as_deref().map(|n| required("name", n)).transpose()?;
        let email = input.email.map(validate_email).transpose()?;
        let negative = [input.credit_limit, input.outstanding, input.revenue]
            .into_iter()
            .flatten()
            .any(|v| v < Decimal::ZERO);
        if negative {
            return Err(TiersError::NegativeAmount);
        }

        let party = self
            .parties
            .update(&id, |party| {
                if let Some(name) = name {
                    party.name = name;
                }
                if email.is_some() {
                    party.email = email;
                }
                if input.phone.is_some() {
                    party.phone = input.phone;
                }
                if input.address.is_some() {
                    party.address = input.address;
                }
                if let Some(days) = input.payment_terms_days {
                    party.payment_terms_days = days;
                }
                if input.credit_limit.is_some() {
                    party.credit_limit = input.credit_limit;
                }
                if let Some(outstanding) = input.outstanding {
                    party.outstanding = outstanding;
                }
                if let Some(revenue) = input.revenue {
                    party.revenue = revenue;
                }
                if let Some(status) = input.status {
                    party.status = status;
                }
                party.updated_at = Utc::now();
                party.clone()
            })
            .ok_or(TiersError::NotFound(id))?;

        info!(third_party_id = %id, "Third party updated");
        Ok(party)
    }

    /// Deletes a third party.
    pub fn delete(&self, id: ThirdPartyId) -> Result<(), TiersError> {
        self.parties.remove(&id).ok_or(TiersError::NotFound(id))?;
        info!(third_party_id = %id, "Third party deleted");
        Ok(())
    }

    /// Days sales outstanding: `outstanding / revenue * days`, one decimal,
    /// `0` without revenue. Saturates at `Decimal::MAX` / `Decimal::MIN`
    /// when the ratio overflows.
    #[must_use]
    pub fn dso(outstanding: Decimal, revenue: Decimal, days: u32) -> Decimal {
        if revenue.is_zero() {
            return Decimal::ZERO;
        }
        let saturated = if outstanding.is_sign_negative() == revenue.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        };
        outstanding
            .checked_div(revenue)
            .and_then(|ratio| ratio.checked_mul(Decimal::from(days)))
            .map_or(saturated, |dso| dso.round_dp(1))
    }

    /// Whether the amount owed exceeds the credit limit.
    #[must_use]
    pub fn is_over_credit_limit(party: &ThirdParty) -> bool {
        party.credit_limit.is_some_and(|limit| party.outstanding > limit)
    }
}

fn required(field: &'static str, value: &str) -> Result<String, TiersError> {
    let value = value.trim();
    if value.is_empty() {
        Err(TiersError::Required(field))
    } else {
        Ok(value.to_string())
    }
}

fn validate_email(email: String) -> Result<String, TiersError> {
    let email = email.trim().to_string();
    let valid = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.contains('@')
            && domain
                .split_once('.')
                .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
    });
    if valid {
        Ok(email)
    } else {
        Err(TiersError::InvalidEmail(email))
    }
}

fn validate_account(account: String) -> Result<String, TiersError> {
    let account = account.trim().to_string();
    let digits = !account.is_empty() && account.chars().all(|c| c.is_ascii_digit());
    if digits && (account.starts_with("40") || account.starts_with("41")) {
        Ok(account)
    } else {
        Err(TiersError::InvalidAccount(account))
    }
}
