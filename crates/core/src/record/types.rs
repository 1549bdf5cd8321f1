use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Money;

/// A professional service performed on a given day (e.g. a medication review).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionalService {
    pub service_type: String,
    pub cost: Option<Money>,
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_string")]
    pub patient_name: Option<String>,
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_date")]
    pub patient_dob: Option<NaiveDate>,
    #[serde(default, deserialize_with = "crate::serde::deserialize_optional_string")]
    pub pharmacist_name: Option<String>,
}

impl ProfessionalService {
    /// Creates a service of the given type without cost or participants.
    pub fn new(service_type: impl Into<String>) -> Self {
        Self {
            service_type: service_type.into(),
            cost: None,
            patient_name: None,
            patient_dob: None,
            pharmacist_name: None,
        }
    }

    /// Sets the cost billed for this service.
    pub fn with_cost(mut self, cost: Money) -> Self {
        self.cost = Some(cost);
        self
    }

    /// Sets the patient and pharmacist involved.
    pub fn with_participants(
        mut self,
        patient_name: impl Into<String>,
        pharmacist_name: impl Into<String>,
    ) -> Self {
        self.patient_name = Some(patient_name.into());
        self.pharmacist_name = Some(pharmacist_name.into());
        self
    }
}

/// The operations entry for one calendar date. There is at most one per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    #[serde(default = "Uuid::new_v4")]
    pub id: Uuid,
    pub date: NaiveDate,

    // Deliveries by carrier
    #[serde(default, deserialize_with = "crate::serde::deserialize_count")]
    pub purolator: u32,
    #[serde(default, deserialize_with = "crate::serde::deserialize_count")]
    pub fedex: u32,
    #[serde(default, deserialize_with = "crate::serde::deserialize_count")]
    pub one_courier: u32,
    #[serde(default, deserialize_with = "crate::serde::deserialize_count")]
    pub go_bolt: u32,

    // Prescriptions
    #[serde(default, deserialize_with = "crate::serde::deserialize_count")]
    pub new_rx: u32,
    #[serde(default, deserialize_with = "crate::serde::deserialize_count")]
    pub refill: u32,
    #[serde(default, deserialize_with = "crate::serde::deserialize_count")]
    pub re_auth: u32,
    #[serde(default, deserialize_with = "crate::serde::deserialize_count")]
    pub hold: u32,

    // Profiles
    #[serde(default, deserialize_with = "crate::serde::deserialize_count")]
    pub profiles_entered: u32,
    #[serde(default, deserialize_with = "crate::serde::deserialize_count")]
    pub who_filled_rx: u32,
    /// Percentage of active profiles, 0 to 100.
    #[serde(default)]
    pub active_percentage: Option<f64>,

    #[serde(default)]
    pub service: Option<ProfessionalService>,
}

impl DailyRecord {
    /// Creates an empty record for the given date.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            date,
            purolator: 0,
            fedex: 0,
            one_courier: 0,
            go_bolt: 0,
            new_rx: 0,
            refill: 0,
            re_auth: 0,
            hold: 0,
            profiles_entered: 0,
            who_filled_rx: 0,
            active_percentage: None,
            service: None,
        }
    }

    /// Sets a specific ID for this record (useful for testing).
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    /// Sets the delivery counts, in carrier order: Purolator, FedEx, OneCourier, GoBolt.
    pub fn with_deliveries(
        mut self,
        purolator: u32,
        fedex: u32,
        one_courier: u32,
        go_bolt: u32,
    ) -> Self {
        self.purolator = purolator;
        self.fedex = fedex;
        self.one_courier = one_courier;
        self.go_bolt = go_bolt;
        self
    }

    /// Sets the prescription counts.
    pub fn with_prescriptions(
        mut self,
        new_rx: u32,
        refill: u32,
        re_auth: u32,
        hold: u32,
    ) -> Self {
        self.new_rx = new_rx;
        self.refill = refill;
        self.re_auth = re_auth;
        self.hold = hold;
        self
    }

    /// Sets the number of profiles entered.
    pub fn with_profiles_entered(mut self, profiles_entered: u32) -> Self {
        self.profiles_entered = profiles_entered;
        self
    }

    /// Attaches a professional service.
    pub fn with_service(mut self, service: ProfessionalService) -> Self {
        self.service = Some(service);
        self
    }

    /// Deliveries across all carriers.
    pub fn total_deliveries(&self) -> u64 {
        u64::from(self.purolator)
            + u64::from(self.fedex)
            + u64::from(self.one_courier)
            + u64::from(self.go_bolt)
    }

    /// Prescriptions filled: new, refill and re-authorized.
    pub fn total_filled(&self) -> u64 {
        u64::from(self.new_rx) + u64::from(self.refill) + u64::from(self.re_auth)
    }

    /// Prescriptions entered: filled plus on hold.
    pub fn total_entered(&self) -> u64 {
        self.total_filled() + u64::from(self.hold)
    }

    /// Returns the service type if a professional service was recorded.
    pub fn service_type(&self) -> Option<&str> {
        self.service.as_ref().map(|s| s.service_type.as_str())
    }

    /// Returns true if a professional service was recorded on this date.
    pub fn has_service(&self) -> bool {
        self.service.is_some()
    }
}
