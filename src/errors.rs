// ============================================================
// Named failure conditions. Every rejected call reverts with
// exactly one of these messages.
// ============================================================

// ── Authorization ──
pub const ERR_NOT_ADMINISTRATOR: &str = "Caller is not the administrator";
pub const ERR_DELEGATED_MODE_OFF: &str = "Delegated authority is not active";
pub const ERR_DELEGATED_MODE_ACTIVE: &str = "Delegated authority blocks proposal execution";
pub const ERR_GOVERNANCE_ONLY: &str = "Action requires a governance decision";
pub const ERR_NOT_MEMBER: &str = "Only members can do this";
pub const ERR_NOT_PROPOSER: &str = "Only the proposer can cancel";
pub const ERR_REENTRANT_CALL: &str = "Dispatch already in progress";

// ── Membership ──
pub const ERR_ALREADY_MEMBER: &str = "Recipient is already a member";
pub const ERR_JOIN_PAUSED: &str = "Joining is paused";
pub const ERR_MEMBERSHIP_CAP_REACHED: &str = "Membership cap reached";
pub const ERR_PRICE_ABOVE_CEILING: &str = "Entry price exceeds caller ceiling";
pub const ERR_WRONG_PAYMENT_ASSET: &str = "Wrong payment asset";
pub const ERR_INSUFFICIENT_PAYMENT: &str = "Payment below entry price";
pub const ERR_ZERO_ADDRESS: &str = "Zero address not allowed";

// ── Asset validity ──
pub const ERR_ASSET_NOT_CONSERVING: &str = "Payment asset failed the conservation check";

// ── Treasury ──
pub const ERR_NOTHING_TO_CLAIM: &str = "Nothing to claim";
pub const ERR_CLAIM_EXCEEDS_POOL: &str = "Claim exceeds pool balance";
pub const ERR_NOTHING_TO_DISBAND: &str = "Nothing to disband";
pub const ERR_INSUFFICIENT_TREASURY: &str = "Insufficient treasury balance";
pub const ERR_ZERO_AMOUNT: &str = "Amount must be positive";
pub const ERR_PRIMARY_ASSET: &str = "Primary asset cannot be cleaned up";
pub const ERR_ASSET_NOT_REGISTERED: &str = "Asset is not registered";
pub const ERR_POOL_NOT_DRAINED: &str = "Pool still holds balance or remainder";
pub const ERR_REGISTRY_FULL: &str = "Secondary asset registry is full";

// ── Batch external call ──
pub const ERR_BATCH_EMPTY: &str = "Batch is empty";
pub const ERR_BATCH_LENGTH_MISMATCH: &str = "Batch arrays differ in length";
pub const ERR_BATCH_ZERO_TARGET: &str = "Batch target is the zero address";
pub const ERR_BATCH_VALUE_MISMATCH: &str = "Attached value differs from sum of call values";
pub const ERR_MALFORMED_PAYLOAD: &str = "Malformed call payload";

// ── Governance ──
pub const ERR_PROPOSAL_NOT_FOUND: &str = "Proposal does not exist";
pub const ERR_ACTIVE_PROPOSAL_EXISTS: &str = "Proposer already has an active proposal";
pub const ERR_WRONG_PROPOSAL_FEE: &str = "Proposal fee mismatch";
pub const ERR_VOTING_CLOSED: &str = "Voting is closed";
pub const ERR_NOT_ELIGIBLE_VOTER: &str = "Voter joined after proposal creation";
pub const ERR_VOTE_UNCHANGED: &str = "Vote already cast with this choice";
pub const ERR_DEADLINE_NOT_REACHED: &str = "Anchored deadline not reached";
pub const ERR_ALREADY_EXECUTED: &str = "Proposal already executed";
pub const ERR_PROPOSAL_CANCELLED: &str = "Proposal was cancelled";
pub const ERR_QUORUM_NOT_MET: &str = "Quorum not met";
pub const ERR_NOT_APPROVED: &str = "Yes votes do not exceed no votes";
pub const ERR_EXECUTION_WINDOW_CLOSED: &str = "Execution window has closed";
pub const ERR_CANCEL_AFTER_QUORUM: &str = "Cannot cancel after quorum";

// ── Configuration validity ──
pub const ERR_SPLIT_NOT_FULL: &str = "Fee split must sum to 10000 bps";
pub const ERR_CURVE_EMPTY: &str = "Curve needs at least one segment";
pub const ERR_CURVE_TOO_MANY_SEGMENTS: &str = "Curve has too many segments";
pub const ERR_CURVE_ZERO_LENGTH_SEGMENT: &str = "Only the final segment may have zero length";
pub const ERR_CURVE_ZERO_DIVISOR: &str = "Curve rate denominator is zero";
pub const ERR_QUORUM_OUT_OF_RANGE: &str = "Quorum must be within (0, 10000] bps";
pub const ERR_INSTANT_BELOW_QUORUM: &str = "Instant quorum below normal quorum";
pub const ERR_DELAY_OUT_OF_RANGE: &str = "Delay out of range";
pub const ERR_SHARE_OUT_OF_RANGE: &str = "Share must not exceed 10000 bps";
