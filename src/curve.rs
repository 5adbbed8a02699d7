multiversx_sc::imports!();
multiversx_sc::derive_imports!();

use crate::dispatch::Capability;
use crate::errors::*;

/// Upper bound on the number of segments a curve may carry.
pub const MAX_CURVE_SEGMENTS: usize = 8;

/// Default denominator for segment rates: rates are basis points.
pub const DEFAULT_RATE_DENOMINATOR: u64 = 10_000;

/// Width, in bytes, of the largest fee the curve will ever quote.
const MAX_FEE_BYTES: usize = 32;

/// Fixed-point unit for compounding; 10^36.
const COMPOUND_SCALE_ROOT: u64 = 1_000_000_000_000_000_000;

// ============================================================
// Curve types
// ============================================================

#[type_abi]
#[derive(
    TopEncode, TopDecode, NestedEncode, NestedDecode, ManagedVecItem, Clone, Copy, PartialEq, Debug,
)]
pub enum CurveStyle {
    // Price stays at the segment anchor.
    Static,
    // Anchor plus `rate / denominator × anchor` per join into the segment.
    Linear,
    // Anchor compounded by `(1 + rate / denominator)` once per join.
    Exponential,
}

#[type_abi]
#[derive(
    TopEncode, TopDecode, NestedEncode, NestedDecode, ManagedVecItem, Clone, Copy, PartialEq, Debug,
)]
pub struct CurveSegment {
    pub style: CurveStyle,
    pub rate: u64,
    /// Joins covered by this segment. Zero means "all remaining joins"
    /// and is only legal on the final segment.
    pub length: u64,
}

impl CurveSegment {
    pub fn new(style: CurveStyle, rate: u64, length: u64) -> Self {
        CurveSegment {
            style,
            rate,
            length,
        }
    }
}

#[type_abi]
#[derive(TopEncode, TopDecode, NestedEncode, NestedDecode, Clone, PartialEq, Debug)]
pub struct EntryFeeCurve<M: ManagedTypeApi> {
    /// Anchor of the first segment: the price paid by the very first joiner.
    pub base_fee: BigUint<M>,
    /// Divisor applied to every segment rate.
    pub rate_denominator: u64,
    pub segments: ManagedVec<M, CurveSegment>,
}

/// The largest fee the curve can quote; every result saturates here.
pub fn max_fee<M: ManagedTypeApi>() -> BigUint<M> {
    BigUint::from_bytes_be(&[0xffu8; MAX_FEE_BYTES])
}

impl<M: ManagedTypeApi> EntryFeeCurve<M> {
    /// A flat entry price.
    pub fn fixed(price: BigUint<M>) -> Self {
        let mut segments = ManagedVec::new();
        segments.push(CurveSegment::new(CurveStyle::Static, 0, 0));
        EntryFeeCurve {
            base_fee: price,
            rate_denominator: DEFAULT_RATE_DENOMINATOR,
            segments,
        }
    }

    /// Builds a curve from the legacy `primary / secondary / pivot` shape:
    /// the primary segment covers the first `pivot` joins, the secondary
    /// absorbs everything after.
    #[deprecated(note = "describe the curve with explicit segments instead")]
    pub fn from_pivot(
        base_fee: BigUint<M>,
        primary: (CurveStyle, u64),
        secondary: (CurveStyle, u64),
        pivot: u64,
    ) -> Self {
        let mut segments = ManagedVec::new();
        segments.push(CurveSegment::new(primary.0, primary.1, pivot));
        segments.push(CurveSegment::new(secondary.0, secondary.1, 0));
        EntryFeeCurve {
            base_fee,
            rate_denominator: DEFAULT_RATE_DENOMINATOR,
            segments,
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        let count = self.segments.len();
        if count == 0 {
            return Err(ERR_CURVE_EMPTY);
        }
        if count > MAX_CURVE_SEGMENTS {
            return Err(ERR_CURVE_TOO_MANY_SEGMENTS);
        }
        if self.rate_denominator == 0 {
            return Err(ERR_CURVE_ZERO_DIVISOR);
        }
        for (index, segment) in self.segments.iter().enumerate() {
            if segment.length == 0 && index + 1 != count {
                return Err(ERR_CURVE_ZERO_LENGTH_SEGMENT);
            }
        }
        Ok(())
    }

    /// Price of the next join, given how many joins have already happened.
    ///
    /// Walks the segments accumulating consumed joins until it finds the one
    /// containing `joins_so_far`. The final segment absorbs every join past
    /// the end of the schedule, whatever its declared length.
    pub fn price(&self, joins_so_far: u64) -> BigUint<M> {
        let cap = max_fee::<M>();
        let mut anchor = if self.base_fee > cap {
            cap.clone()
        } else {
            self.base_fee.clone()
        };

        let last = self.segments.len().saturating_sub(1);
        let mut consumed = 0u64;
        for (index, segment) in self.segments.iter().enumerate() {
            let into_segment = joins_so_far.saturating_sub(consumed);
            if index == last || segment.length == 0 || into_segment < segment.length {
                return self.segment_price(&anchor, &segment, into_segment, &cap);
            }
            anchor = self.segment_price(&anchor, &segment, segment.length, &cap);
            consumed = consumed.saturating_add(segment.length);
        }
        anchor
    }

    fn segment_price(
        &self,
        anchor: &BigUint<M>,
        segment: &CurveSegment,
        joins_into_segment: u64,
        cap: &BigUint<M>,
    ) -> BigUint<M> {
        if joins_into_segment == 0 || segment.rate == 0 {
            return anchor.clone();
        }
        match segment.style {
            CurveStyle::Static => anchor.clone(),
            CurveStyle::Linear => {
                let increment = anchor
                    * &BigUint::from(segment.rate)
                    * &BigUint::from(joins_into_segment)
                    / &BigUint::from(self.rate_denominator);
                let price = anchor + &increment;
                if &price > cap {
                    cap.clone()
                } else {
                    price
                }
            },
            CurveStyle::Exponential => compound(
                anchor,
                self.rate_denominator.saturating_add(segment.rate),
                self.rate_denominator,
                joins_into_segment,
                cap,
            ),
        }
    }
}

/// `anchor × (factor / denominator)^joins`, saturating at `cap`.
///
/// Square-and-multiply over a 10^36 fixed-point multiplier, so the cost is
/// logarithmic in `joins`. Every multiplier is at least one, so once the
/// running power or the squared base reaches `bound` the result is known
/// to saturate and the loop stops before the numbers grow further.
fn compound<M: ManagedTypeApi>(
    anchor: &BigUint<M>,
    factor: u64,
    denominator: u64,
    joins: u64,
    cap: &BigUint<M>,
) -> BigUint<M> {
    if *anchor == 0u64 {
        return BigUint::zero();
    }
    let root = BigUint::<M>::from(COMPOUND_SCALE_ROOT);
    let scale = &root * &root;
    let bound = &(&(cap * &scale) / anchor) + &BigUint::from(1u64);

    let mut power = scale.clone();
    let mut base = &(&BigUint::from(factor) * &scale) / &BigUint::from(denominator);
    let mut remaining = joins;
    loop {
        if remaining & 1 == 1 {
            power = &(&power * &base) / &scale;
            if power >= bound {
                return cap.clone();
            }
        }
        remaining >>= 1;
        if remaining == 0 {
            break;
        }
        base = &(&base * &base) / &scale;
        if base >= bound {
            return cap.clone();
        }
    }

    let price = &(anchor * &power) / &scale;
    if &price > cap {
        cap.clone()
    } else {
        price
    }
}

// ============================================================
// Curve storage and governance mutator
// ============================================================

#[multiversx_sc::module]
pub trait CurveModule: crate::config::ConfigModule + crate::events::EventsModule {
    fn init_curve(&self, curve: EntryFeeCurve<Self::Api>) {
        self.require_valid(curve.validate());
        self.entry_fee_curve().set(&curve);
    }

    /// Replaces the whole curve at once; a curve is never edited in place.
    fn replace_curve(&self, _authority: &Capability, curve: EntryFeeCurve<Self::Api>) {
        self.require_valid(curve.validate());
        let old = self.entry_fee_curve().get();
        self.entry_fee_curve().set(&curve);
        self.curve_updated_event(&old, &curve);
    }

    fn quote_price(&self, joins_so_far: u64) -> BigUint {
        self.entry_fee_curve().get().price(joins_so_far)
    }

    #[storage_mapper("entryFeeCurve")]
    fn entry_fee_curve(&self) -> SingleValueMapper<EntryFeeCurve<Self::Api>>;
}
