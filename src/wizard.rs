use chrono::NaiveDate;
use thiserror::Error;

use crate::cart::Cart;
use crate::models::{Professional, Service};

/// Masked phone "(XX) XXXXX-XXXX" reaches 14 chars once the number has
/// enough digits to be reachable.
const PHONE_MIN_LEN: usize = 14;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("current step is missing a required selection")]
    GuardFailed,
    #[error("action not available on this step")]
    WrongStep,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepKind {
    Services,
    Professional,
    Schedule,
    Identify,
    Success,
}

/// Booking flow for one visitor. Steps are strictly linear; each carries
/// only the data collected so far, so going back drops everything gathered
/// past the target step.
#[derive(Debug, Clone, Default)]
pub struct Wizard {
    cart: Cart,
    step: Step,
}

#[derive(Debug, Clone, Default)]
enum Step {
    #[default]
    Services,
    Professional {
        selected: Option<Professional>,
    },
    Schedule {
        professional: Professional,
        date: Option<NaiveDate>,
        time: Option<String>,
    },
    Identify {
        professional: Professional,
        date: NaiveDate,
        time: String,
        name: String,
        phone: String,
    },
    Success(Confirmation),
}

/// Snapshot taken when a booking is confirmed.
#[derive(Debug, Clone)]
pub struct Confirmation {
    pub services: Vec<Service>,
    pub professional: Professional,
    pub date: NaiveDate,
    pub time: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub total_duration_min: u32,
    pub total_price: u32,
}

impl Wizard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step_kind(&self) -> StepKind {
        match &self.step {
            Step::Services => StepKind::Services,
            Step::Professional { .. } => StepKind::Professional,
            Step::Schedule { .. } => StepKind::Schedule,
            Step::Identify { .. } => StepKind::Identify,
            Step::Success(_) => StepKind::Success,
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Cart edits are allowed on every step before success. Emptying the
    /// cart mid-flow forces the wizard back to the first step.
    pub fn toggle_service(&mut self, service: &Service) -> Result<(), WizardError> {
        if matches!(self.step, Step::Success(_)) {
            return Err(WizardError::WrongStep);
        }
        self.cart.toggle(service);
        if self.cart.is_empty() && !matches!(self.step, Step::Services) {
            self.step = Step::Services;
        }
        Ok(())
    }

    pub fn choose_professional(&mut self, professional: &Professional) -> Result<(), WizardError> {
        match &mut self.step {
            Step::Professional { selected } => {
                *selected = Some(professional.clone());
                Ok(())
            }
            _ => Err(WizardError::WrongStep),
        }
    }

    /// Picking a date invalidates any slot chosen for the previous date.
    pub fn choose_date(&mut self, new_date: NaiveDate) -> Result<(), WizardError> {
        match &mut self.step {
            Step::Schedule { date, time, .. } => {
                *date = Some(new_date);
                *time = None;
                Ok(())
            }
            _ => Err(WizardError::WrongStep),
        }
    }

    pub fn choose_time(&mut self, new_time: &str) -> Result<(), WizardError> {
        match &mut self.step {
            Step::Schedule {
                date: Some(_),
                time,
                ..
            } => {
                *time = Some(new_time.to_string());
                Ok(())
            }
            Step::Schedule { .. } => Err(WizardError::GuardFailed),
            _ => Err(WizardError::WrongStep),
        }
    }

    pub fn set_contact(&mut self, new_name: &str, new_phone: &str) -> Result<(), WizardError> {
        match &mut self.step {
            Step::Identify { name, phone, .. } => {
                *name = new_name.trim().to_string();
                *phone = mask_phone(new_phone);
                Ok(())
            }
            _ => Err(WizardError::WrongStep),
        }
    }

    /// Moves one step forward if the current step's guard holds.
    pub fn advance(&mut self) -> Result<(), WizardError> {
        let step = std::mem::take(&mut self.step);
        let next = match step {
            Step::Services => {
                if self.cart.is_empty() {
                    self.step = Step::Services;
                    return Err(WizardError::GuardFailed);
                }
                Step::Professional { selected: None }
            }
            Step::Professional {
                selected: Some(professional),
            } => Step::Schedule {
                professional,
                date: None,
                time: None,
            },
            step @ Step::Professional { selected: None } => {
                self.step = step;
                return Err(WizardError::GuardFailed);
            }
            Step::Schedule {
                professional,
                date: Some(date),
                time: Some(time),
            } => Step::Identify {
                professional,
                date,
                time,
                name: String::new(),
                phone: String::new(),
            },
            step @ Step::Schedule { .. } => {
                self.step = step;
                return Err(WizardError::GuardFailed);
            }
            step @ (Step::Identify { .. } | Step::Success(_)) => {
                self.step = step;
                return Err(WizardError::WrongStep);
            }
        };
        self.step = next;
        Ok(())
    }

    /// Moves one step back, discarding everything collected after the
    /// target step.
    pub fn retreat(&mut self) -> Result<(), WizardError> {
        let step = std::mem::take(&mut self.step);
        let previous = match step {
            Step::Professional { .. } => Step::Services,
            Step::Schedule { professional, .. } => Step::Professional {
                selected: Some(professional),
            },
            Step::Identify {
                professional,
                date,
                time,
                ..
            } => Step::Schedule {
                professional,
                date: Some(date),
                time: Some(time),
            },
            step @ (Step::Services | Step::Success(_)) => {
                self.step = step;
                return Err(WizardError::WrongStep);
            }
        };
        self.step = previous;
        Ok(())
    }

    /// Finishes the flow when name, phone and cart all pass their guards.
    /// The guard runs on every attempt, the step never caches a verdict.
    pub fn confirm(&mut self) -> Result<Confirmation, WizardError> {
        let step = std::mem::take(&mut self.step);
        match step {
            Step::Identify {
                professional,
                date,
                time,
                name,
                phone,
            } => {
                if name.is_empty() || !phone_complete(&phone) || self.cart.is_empty() {
                    self.step = Step::Identify {
                        professional,
                        date,
                        time,
                        name,
                        phone,
                    };
                    return Err(WizardError::GuardFailed);
                }
                let confirmation = Confirmation {
                    services: self.cart.items().to_vec(),
                    total_duration_min: self.cart.total_duration_min(),
                    total_price: self.cart.total_price(),
                    professional,
                    date,
                    time,
                    customer_name: name,
                    customer_phone: phone,
                };
                self.step = Step::Success(confirmation.clone());
                Ok(confirmation)
            }
            step => {
                self.step = step;
                Err(WizardError::WrongStep)
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Wizard::default();
    }

    pub fn selected_professional(&self) -> Option<&Professional> {
        match &self.step {
            Step::Professional { selected } => selected.as_ref(),
            Step::Schedule { professional, .. } | Step::Identify { professional, .. } => {
                Some(professional)
            }
            _ => None,
        }
    }

    pub fn chosen_date(&self) -> Option<NaiveDate> {
        match &self.step {
            Step::Schedule { date, .. } => *date,
            Step::Identify { date, .. } => Some(*date),
            _ => None,
        }
    }

    pub fn chosen_time(&self) -> Option<&str> {
        match &self.step {
            Step::Schedule { time, .. } => time.as_deref(),
            Step::Identify { time, .. } => Some(time),
            _ => None,
        }
    }

    pub fn contact(&self) -> Option<(&str, &str)> {
        match &self.step {
            Step::Identify { name, phone, .. } => Some((name, phone)),
            _ => None,
        }
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        match &self.step {
            Step::Success(confirmation) => Some(confirmation),
            _ => None,
        }
    }
}

/// Progressive "(XX) XXXXX-XXXX" mask: non-digits dropped, capped at the
/// 11 digits of a BR mobile number.
pub fn mask_phone(input: &str) -> String {
    let mut value: String = input.chars().filter(|c| c.is_ascii_digit()).collect();
    value.truncate(11);
    if value.len() > 2 {
        value = format!("({}) {}", &value[..2], &value[2..]);
    }
    if value.len() > 9 {
        value = format!("{}-{}", &value[..10], &value[10..]);
    }
    value
}

pub fn phone_complete(masked: &str) -> bool {
    masked.len() >= PHONE_MIN_LEN
}
