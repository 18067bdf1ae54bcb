//! The portal: local view state kept in step with the remote store.
//!
//! [`Portal`] holds the donor and donation lists, the two entry forms, and
//! the last status message. Every write goes to the server first; on success
//! the affected list is fetched again instead of being patched locally.

use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::api::DonorApi;
use crate::error::{Error, Result};
use crate::model::{Donation, Donor, NewDonation, NewDonor, StatusReply};

/// Message shown when creating a donor fails.
pub const ADD_DONOR_FAILED: &str = "Error adding donor";
/// Message shown when deleting a donor fails.
pub const DELETE_DONOR_FAILED: &str = "Error deleting donor";
/// Message shown when recording a donation fails.
pub const SAVE_DONATION_FAILED: &str = "Error saving donation";

/// Where a form is in its submit cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    /// Accepting input.
    #[default]
    Editing,
    /// A submission is waiting on the server.
    ///
    /// Only held inside `create_donor`/`create_donation`, which borrow the
    /// portal mutably; callers never observe it between calls.
    Submitting,
    /// The last submission failed; the entered values are still there.
    Failed,
}

/// Input for the "Add Donor" form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DonorForm {
    /// Donor name (required).
    pub name: String,
    /// Blood group (required).
    pub blood_group: String,
    /// Phone number.
    pub phone: String,
    /// Email address.
    pub email: String,
    /// City.
    pub city: String,
}

impl DonorForm {
    /// Build the create payload, checking required fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] for an empty name or blood group.
    pub fn to_new_donor(&self) -> Result<NewDonor> {
        Ok(NewDonor {
            name: required("donor", "name", &self.name)?,
            blood_group: required("donor", "blood group", &self.blood_group)?,
            phone: optional(&self.phone),
            email: optional(&self.email),
            city: optional(&self.city),
        })
    }
}

/// Input for the "Record Donation" form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationForm {
    /// Selected donor id; empty means nothing selected.
    pub donor_id: String,
    /// Units given.
    pub quantity: u32,
    /// Day of the donation.
    pub date: Option<NaiveDate>,
    /// Location.
    pub location: String,
    /// Notes.
    pub notes: String,
}

impl Default for DonationForm {
    fn default() -> Self {
        Self {
            donor_id: String::new(),
            quantity: 1,
            date: None,
            location: String::new(),
            notes: String::new(),
        }
    }
}

impl DonationForm {
    /// Build the create payload, checking required fields are present.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] when no donor is selected, the
    /// quantity is zero, or the date is unset.
    pub fn to_new_donation(&self) -> Result<NewDonation> {
        let donor_id = required("donation", "donor", &self.donor_id)?;
        if self.quantity < 1 {
            return Err(Error::missing_field("donation", "quantity"));
        }
        let date = self
            .date
            .ok_or_else(|| Error::missing_field("donation", "date"))?;

        Ok(NewDonation {
            donor_id,
            quantity: self.quantity,
            date,
            location: optional(&self.location),
            notes: optional(&self.notes),
        })
    }
}

// Form text is submitted trimmed.
fn required(form: &'static str, field: &'static str, value: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(Error::missing_field(form, field))
    } else {
        Ok(value.to_string())
    }
}

fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

/// One entry of the donation form's donor selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonorOption {
    /// Donor id submitted when chosen.
    pub value: String,
    /// Text shown, `name (bloodGroup)`.
    pub label: String,
}

/// Local mirror of the remote donor and donation collections.
#[derive(Debug)]
pub struct Portal<A> {
    api: A,
    donors: Vec<Donor>,
    donations: Vec<Donation>,
    message: Option<String>,
    donor_form: DonorForm,
    donor_form_state: FormState,
    donation_form: DonationForm,
    donation_form_state: FormState,
}

impl<A: DonorApi> Portal<A> {
    /// Create an empty portal backed by `api`.
    #[must_use]
    pub fn new(api: A) -> Self {
        Self {
            api,
            donors: Vec::new(),
            donations: Vec::new(),
            message: None,
            donor_form: DonorForm::default(),
            donor_form_state: FormState::Editing,
            donation_form: DonationForm::default(),
            donation_form_state: FormState::Editing,
        }
    }

    /// The client this portal talks through.
    #[must_use]
    pub fn api(&self) -> &A {
        &self.api
    }

    /// Current donor list.
    #[must_use]
    pub fn donors(&self) -> &[Donor] {
        &self.donors
    }

    /// Current donation list.
    #[must_use]
    pub fn donations(&self) -> &[Donation] {
        &self.donations
    }

    /// Last status or error message.
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// The donor form's current values.
    #[must_use]
    pub fn donor_form(&self) -> &DonorForm {
        &self.donor_form
    }

    /// Edit the donor form.
    pub fn donor_form_mut(&mut self) -> &mut DonorForm {
        &mut self.donor_form
    }

    /// Where the donor form is in its submit cycle.
    #[must_use]
    pub fn donor_form_state(&self) -> FormState {
        self.donor_form_state
    }

    /// The donation form's current values.
    #[must_use]
    pub fn donation_form(&self) -> &DonationForm {
        &self.donation_form
    }

    /// Edit the donation form.
    pub fn donation_form_mut(&mut self) -> &mut DonationForm {
        &mut self.donation_form
    }

    /// Where the donation form is in its submit cycle.
    #[must_use]
    pub fn donation_form_state(&self) -> FormState {
        self.donation_form_state
    }

    /// Options for the donation form's donor selector.
    #[must_use]
    pub fn donor_options(&self) -> Vec<DonorOption> {
        self.donors
            .iter()
            .map(|donor| DonorOption {
                value: donor.id.clone(),
                label: donor.option_label(),
            })
            .collect()
    }

    /// Initial load of both lists.
    pub async fn load(&mut self) {
        self.refresh_donors().await;
        self.refresh_donations().await;
    }

    /// Replace the donor list with the server's. Failures keep the old list.
    pub async fn refresh_donors(&mut self) {
        match self.api.list_donors().await {
            Ok(donors) => {
                debug!(count = donors.len(), "donors refreshed");
                self.donors = donors;
            }
            Err(e) => warn!(error = %e, "failed to load donors"),
        }
    }

    /// Replace the donation list with the server's. Failures keep the old list.
    pub async fn refresh_donations(&mut self) {
        match self.api.list_donations().await {
            Ok(donations) => {
                debug!(count = donations.len(), "donations refreshed");
                self.donations = donations;
            }
            Err(e) => warn!(error = %e, "failed to load donations"),
        }
    }

    /// Submit the donor form.
    ///
    /// On success the form is cleared and the donor list reloaded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] without contacting the server when a
    /// required field is empty, or the API error after showing
    /// [`ADD_DONOR_FAILED`].
    pub async fn create_donor(&mut self) -> Result<()> {
        let donor = self.donor_form.to_new_donor()?;

        self.donor_form_state = FormState::Submitting;
        match self.api.create_donor(&donor).await {
            Ok(reply) => {
                info!(name = %donor.name, "donor added");
                self.show_status(reply);
                self.donor_form = DonorForm::default();
                self.donor_form_state = FormState::Editing;
                self.refresh_donors().await;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to add donor");
                self.message = Some(ADD_DONOR_FAILED.to_string());
                self.donor_form_state = FormState::Failed;
                Err(e)
            }
        }
    }

    /// Delete a donor. There is no confirmation step.
    ///
    /// # Errors
    ///
    /// Returns the API error after showing [`DELETE_DONOR_FAILED`].
    pub async fn delete_donor(&mut self, id: &str) -> Result<()> {
        match self.api.delete_donor(id).await {
            Ok(reply) => {
                info!(%id, "donor deleted");
                self.show_status(reply);
                self.refresh_donors().await;
                Ok(())
            }
            Err(e) => {
                warn!(%id, error = %e, "failed to delete donor");
                self.message = Some(DELETE_DONOR_FAILED.to_string());
                Err(e)
            }
        }
    }

    /// Submit the donation form.
    ///
    /// On success the form is reset (quantity back to 1) and the donation
    /// list reloaded.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingField`] without contacting the server when a
    /// required field is missing, or the API error after showing
    /// [`SAVE_DONATION_FAILED`].
    pub async fn create_donation(&mut self) -> Result<()> {
        let donation = self.donation_form.to_new_donation()?;

        self.donation_form_state = FormState::Submitting;
        match self.api.create_donation(&donation).await {
            Ok(reply) => {
                info!(donor = %donation.donor_id, quantity = donation.quantity, "donation saved");
                self.show_status(reply);
                self.donation_form = DonationForm::default();
                self.donation_form_state = FormState::Editing;
                self.refresh_donations().await;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "failed to save donation");
                self.message = Some(SAVE_DONATION_FAILED.to_string());
                self.donation_form_state = FormState::Failed;
                Err(e)
            }
        }
    }

    fn show_status(&mut self, reply: StatusReply) {
        self.message = reply.status;
    }
}
