//! Classification of exchange errors.
//!
//! Some exchange rejections are not failures for the caller: "leverage
//! already at target" and "nothing to cancel" mean the desired state already
//! holds, and `POSITION_NOT_FOUND` during a position scan just means "flat".
//! All such wording lives in [`RULES`]; operations ask [`classify`] instead of
//! matching strings themselves. Message substrings are matched
//! case-insensitively.

use perp_core::error::TradeError;

use super::transport::GateApiError;

/// Exchange call being classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Account,
    Contracts,
    Position,
    Leverage,
    CancelOrders,
    Order,
    TriggerOrder,
    Ticker,
}

/// Outcome of classifying an exchange error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// API key rejected.
    InvalidKey,
    /// No position on the contract.
    PositionNotFound,
    /// Requested leverage is already in effect.
    LeverageUnchanged,
    /// No resting orders to cancel.
    NothingToCancel,
    /// Genuine failure.
    Rejected,
}

impl ErrorClass {
    /// The desired state already holds; report success.
    pub fn is_already_satisfied(self) -> bool {
        matches!(self, Self::LeverageUnchanged | Self::NothingToCancel)
    }
}

struct Rule {
    /// `None` applies to every operation.
    operation: Option<Operation>,
    label: Option<&'static str>,
    /// Lower-case substring of the exchange message.
    message: Option<&'static str>,
    class: ErrorClass,
}

/// First matching rule wins.
const RULES: &[Rule] = &[
    Rule {
        operation: None,
        label: Some("INVALID_KEY"),
        message: None,
        class: ErrorClass::InvalidKey,
    },
    Rule {
        operation: Some(Operation::Position),
        label: Some("POSITION_NOT_FOUND"),
        message: None,
        class: ErrorClass::PositionNotFound,
    },
    Rule {
        operation: Some(Operation::Leverage),
        label: None,
        message: Some("no need to change"),
        class: ErrorClass::LeverageUnchanged,
    },
    Rule {
        operation: Some(Operation::Leverage),
        label: None,
        message: Some("already"),
        class: ErrorClass::LeverageUnchanged,
    },
    Rule {
        operation: Some(Operation::CancelOrders),
        label: None,
        message: Some("not found"),
        class: ErrorClass::NothingToCancel,
    },
    Rule {
        operation: Some(Operation::CancelOrders),
        label: None,
        message: Some("empty"),
        class: ErrorClass::NothingToCancel,
    },
];

/// Classify a transport error raised by `operation`.
///
/// Network and decoding failures are always [`ErrorClass::Rejected`].
pub fn classify(operation: Operation, err: &GateApiError) -> ErrorClass {
    let GateApiError::Exchange { label, message, .. } = err else {
        return ErrorClass::Rejected;
    };
    let message = message.to_ascii_lowercase();

    RULES
        .iter()
        .find(|rule| {
            rule.operation.is_none_or(|op| op == operation)
                && rule.label.is_none_or(|l| l == label.as_str())
                && rule.message.is_none_or(|m| message.contains(m))
        })
        .map_or(ErrorClass::Rejected, |rule| rule.class)
}

/// Convert a transport error into the adapter's error taxonomy.
///
/// `context` describes what was attempted (e.g. `"fetch account"`). An
/// invalid key always becomes [`TradeError::Authentication`].
pub fn to_trade_error(operation: Operation, context: &str, err: GateApiError) -> TradeError {
    if classify(operation, &err) == ErrorClass::InvalidKey {
        return TradeError::Authentication {
            message: err.exchange_message().unwrap_or_default().to_string(),
        };
    }
    match err {
        GateApiError::Exchange { label, message, .. } => TradeError::Exchange {
            context: context.to_string(),
            label,
            message,
        },
        other => TradeError::Transport {
            context: context.to_string(),
            message: other.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn exchange(label: &str, message: &str) -> GateApiError {
        GateApiError::exchange(label, message)
    }

    #[test]
    fn leverage_unchanged_wording() {
        let err = exchange("INVALID_PARAM_VALUE", "No need to change leverage");
        assert_eq!(
            classify(Operation::Leverage, &err),
            ErrorClass::LeverageUnchanged
        );
        let err = exchange("INVALID_PARAM_VALUE", "leverage is already 10");
        assert_eq!(
            classify(Operation::Leverage, &err),
            ErrorClass::LeverageUnchanged
        );
        assert!(ErrorClass::LeverageUnchanged.is_already_satisfied());
    }

    #[test]
    fn wording_only_applies_to_its_operation() {
        let err = exchange("ORDER_NOT_FOUND", "order not found");
        assert_eq!(
            classify(Operation::CancelOrders, &err),
            ErrorClass::NothingToCancel
        );
        assert_eq!(classify(Operation::Order, &err), ErrorClass::Rejected);

        let err = exchange("INVALID_PARAM_VALUE", "No need to change leverage");
        assert_eq!(classify(Operation::Order, &err), ErrorClass::Rejected);
    }

    #[test]
    fn position_not_found_by_label() {
        let err = exchange("POSITION_NOT_FOUND", "position not found");
        assert_eq!(
            classify(Operation::Position, &err),
            ErrorClass::PositionNotFound
        );
        assert_eq!(classify(Operation::Account, &err), ErrorClass::Rejected);
    }

    #[test]
    fn invalid_key_everywhere() {
        let err = exchange("INVALID_KEY", "Invalid key provided");
        for op in [Operation::Account, Operation::Order, Operation::Leverage] {
            assert_eq!(classify(op, &err), ErrorClass::InvalidKey);
        }
        let mapped = to_trade_error(Operation::Account, "fetch account", err);
        assert!(mapped.to_string().contains("Invalid key provided"));
        assert!(matches!(mapped, TradeError::Authentication { .. }));
    }

    #[test]
    fn decode_errors_are_rejections() {
        let err = GateApiError::Decode("expected value".into());
        assert_eq!(
            classify(Operation::CancelOrders, &err),
            ErrorClass::Rejected
        );
        let mapped = to_trade_error(Operation::Ticker, "fetch ticker", err);
        assert!(matches!(mapped, TradeError::Transport { .. }));
    }

    #[test]
    fn exchange_errors_keep_label_and_message() {
        let err = exchange("CONTRACT_NOT_FOUND", "contract not found");
        let mapped = to_trade_error(Operation::Contracts, "fetch contract", err);
        assert_eq!(
            mapped.to_string(),
            "fetch contract failed: [CONTRACT_NOT_FOUND] contract not found"
        );
    }
}
