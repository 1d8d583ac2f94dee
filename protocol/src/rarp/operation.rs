//! Operation module

/// The ARP/RARP opcode.
///
/// The decoder keeps unknown values, so they can be logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ArpRequest,
    ArpReply,
    RarpRequest,
    RarpReply,
    Undefined(u16),
}

impl From<u16> for Operation {
    fn from(value: u16) -> Self {
        use self::Operation::*;
        match value {
            1 => ArpRequest,
            2 => ArpReply,
            3 => RarpRequest,
            4 => RarpReply,
            value => Undefined(value),
        }
    }
}

impl From<Operation> for u16 {
    fn from(value: Operation) -> Self {
        use self::Operation::*;
        match value {
            ArpRequest => 1,
            ArpReply => 2,
            RarpRequest => 3,
            RarpReply => 4,
            Undefined(value) => value,
        }
    }
}
