use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{BillingError, Cents, Commission, Options};

/// A party whose account moves when a rental is billed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Actor {
    /// The person renting the car
    Driver,
    /// The person renting out the car
    Owner,
    Insurance,
    /// Roadside assistance
    Assistance,
    /// The platform
    Drivy,
}

impl Actor {
    /// Every actor, in ledger order.
    pub const ALL: [Actor; 5] = [
        Actor::Driver,
        Actor::Owner,
        Actor::Insurance,
        Actor::Assistance,
        Actor::Drivy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Actor::Driver => "driver",
            Actor::Owner => "owner",
            Actor::Insurance => "insurance",
            Actor::Assistance => "assistance",
            Actor::Drivy => "drivy",
        }
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Debit,
    Credit,
}

impl ActionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionType::Debit => "debit",
            ActionType::Credit => "credit",
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            ActionType::Debit => ActionType::Credit,
            ActionType::Credit => ActionType::Debit,
        }
    }
}

impl std::fmt::Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One money movement on an actor's account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub who: Actor,
    #[serde(rename = "type")]
    pub kind: ActionType,
    pub amount: Cents,
}

impl Action {
    pub fn debit(who: Actor, amount: Cents) -> Self {
        Self {
            who,
            kind: ActionType::Debit,
            amount,
        }
    }

    pub fn credit(who: Actor, amount: Cents) -> Self {
        Self {
            who,
            kind: ActionType::Credit,
            amount,
        }
    }

    /// Amount as seen from the actor: credits positive, debits negative.
    pub fn signed_amount(&self) -> Cents {
        match self.kind {
            ActionType::Credit => self.amount,
            ActionType::Debit => -self.amount,
        }
    }

    /// What must be billed on top of `previous` to reach this action.
    /// A shrinking amount flips the direction of the movement.
    pub fn delta_from(&self, previous: &Action) -> Action {
        let balance = self.amount - previous.amount;
        let kind = if balance < 0 {
            self.kind.opposite()
        } else {
            self.kind
        };

        Action {
            who: self.who,
            kind,
            amount: balance.abs(),
        }
    }
}

/// Build the ledger of a rental, one action per actor in [`Actor::ALL`] order.
///
/// The driver pays the price and the options. The owner gets the price minus
/// the commission pool, the pool goes to insurance, assistance and the
/// platform, and the platform also keeps the options.
pub fn build_actions(price: Cents, commission: &Commission, options: &Options) -> Vec<Action> {
    vec![
        Action::debit(Actor::Driver, price + options.deductible_reduction),
        Action::credit(
            Actor::Owner,
            price - commission.insurance_fee - commission.assistance_fee - commission.drivy_fee,
        ),
        Action::credit(Actor::Insurance, commission.insurance_fee),
        Action::credit(Actor::Assistance, commission.assistance_fee),
        Action::credit(
            Actor::Drivy,
            commission.drivy_fee + options.deductible_reduction,
        ),
    ]
}

/// Sum of all signed amounts. Zero for a balanced ledger.
pub fn net_balance(actions: &[Action]) -> Cents {
    actions.iter().map(Action::signed_amount).sum()
}

/// Compute, actor by actor, what must be billed to move from the `original`
/// ledger to the `updated` one.
pub fn ledger_delta(original: &[Action], updated: &[Action]) -> Result<Vec<Action>, BillingError> {
    let original_by_actor: HashMap<Actor, &Action> =
        original.iter().map(|action| (action.who, action)).collect();
    let updated_by_actor: HashMap<Actor, &Action> =
        updated.iter().map(|action| (action.who, action)).collect();

    Actor::ALL
        .into_iter()
        .map(|actor| -> Result<Action, BillingError> {
            let before = original_by_actor
                .get(&actor)
                .ok_or(BillingError::UnknownActor(actor))?;
            let after = updated_by_actor
                .get(&actor)
                .ok_or(BillingError::UnknownActor(actor))?;
            Ok(after.delta_from(before))
        })
        .collect()
}
