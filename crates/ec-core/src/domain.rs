//! Spatial domain tags and the rules for combining them.
//!
//! Every expression lives on a [`DomainSpec`]: an optional primary domain and
//! an optional secondary domain. A missing primary domain means the expression
//! is spatially uniform and broadcasts implicitly against anything. Two
//! expressions with different primary domains can only be combined after an
//! explicit broadcast or average.

use core::fmt;

use crate::error::{CoreError, CoreResult};

/// Spatial region an expression is defined over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Domain {
    NegativeElectrode,
    Separator,
    PositiveElectrode,
    /// Concatenation of the three through-cell regions.
    WholeCell,
    CurrentCollector,
}

impl Domain {
    /// Through-cell regions, in concatenation order.
    pub const CELL_REGIONS: [Domain; 3] = [
        Domain::NegativeElectrode,
        Domain::Separator,
        Domain::PositiveElectrode,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Domain::NegativeElectrode => "negative electrode",
            Domain::Separator => "separator",
            Domain::PositiveElectrode => "positive electrode",
            Domain::WholeCell => "whole cell",
            Domain::CurrentCollector => "current collector",
        }
    }

    /// True for regions that x-averaging collapses.
    pub fn is_through_cell(self) -> bool {
        !matches!(self, Domain::CurrentCollector)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Boundary of a spatial domain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Side {
    Left,
    Right,
    NegativeTab,
    PositiveTab,
    /// Current-collector edge away from both tabs.
    NoTab,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Side::Left => "left",
            Side::Right => "right",
            Side::NegativeTab => "negative tab",
            Side::PositiveTab => "positive tab",
            Side::NoTab => "no tab",
        };
        f.write_str(s)
    }
}

/// Primary and secondary domain of an expression.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DomainSpec {
    pub primary: Option<Domain>,
    pub secondary: Option<Domain>,
}

impl DomainSpec {
    /// Spatially uniform.
    pub const fn uniform() -> Self {
        Self {
            primary: None,
            secondary: None,
        }
    }

    pub const fn on(primary: Domain) -> Self {
        Self {
            primary: Some(primary),
            secondary: None,
        }
    }

    pub const fn with_secondary(primary: Domain, secondary: Domain) -> Self {
        Self {
            primary: Some(primary),
            secondary: Some(secondary),
        }
    }

    pub fn is_uniform(&self) -> bool {
        self.primary.is_none()
    }

    /// Domain of a binary operation between `self` and `other`.
    ///
    /// A uniform operand adopts the other operand's domain. Otherwise primary
    /// and secondary domains must agree wherever both are present.
    pub fn combine(self, other: DomainSpec, context: &'static str) -> CoreResult<DomainSpec> {
        let mismatch = || CoreError::DomainMismatch {
            context,
            left: self,
            right: other,
        };
        let primary = merge_slot(self.primary, other.primary).ok_or_else(mismatch)?;
        let secondary = merge_slot(self.secondary, other.secondary).ok_or_else(mismatch)?;
        Ok(DomainSpec { primary, secondary })
    }

    /// Domain after broadcasting onto `target`.
    ///
    /// Only uniform or current-collector expressions can be broadcast; the
    /// current-collector dependence survives as the secondary domain.
    pub fn broadcast_to(self, target: Domain) -> CoreResult<DomainSpec> {
        match self.primary {
            None => Ok(DomainSpec::on(target)),
            Some(Domain::CurrentCollector) if target.is_through_cell() => {
                Ok(DomainSpec::with_secondary(target, Domain::CurrentCollector))
            }
            Some(_) => Err(CoreError::InvalidDomainOperation {
                operation: "broadcast",
                domain: self,
            }),
        }
    }

    /// Domain after averaging over the through-cell coordinate.
    pub fn x_averaged(self) -> CoreResult<DomainSpec> {
        match self.primary {
            None => Ok(self),
            Some(d) if d.is_through_cell() => Ok(DomainSpec {
                primary: self.secondary,
                secondary: None,
            }),
            Some(_) => Err(CoreError::InvalidDomainOperation {
                operation: "x-average",
                domain: self,
            }),
        }
    }

    /// Domain after evaluating on a boundary of the primary domain.
    pub fn at_boundary(self) -> CoreResult<DomainSpec> {
        match self.primary {
            Some(_) => Ok(DomainSpec {
                primary: self.secondary,
                secondary: None,
            }),
            None => Err(CoreError::InvalidDomainOperation {
                operation: "take a boundary value of",
                domain: self,
            }),
        }
    }

    /// Domain of the through-cell concatenation of `parts`.
    pub fn concatenate(parts: &[DomainSpec]) -> CoreResult<DomainSpec> {
        if parts.len() != Domain::CELL_REGIONS.len() {
            let index = parts.len().min(Domain::CELL_REGIONS.len() - 1);
            return Err(CoreError::ConcatenationOrder {
                index,
                expected: Domain::CELL_REGIONS[index],
                found: parts.get(index).copied().unwrap_or_default(),
            });
        }
        let mut secondary = None;
        for (index, (part, expected)) in parts.iter().zip(Domain::CELL_REGIONS).enumerate() {
            if part.primary != Some(expected) {
                return Err(CoreError::ConcatenationOrder {
                    index,
                    expected,
                    found: *part,
                });
            }
            secondary = merge_slot(secondary, part.secondary).ok_or(
                CoreError::DomainMismatch {
                    context: "concatenation",
                    left: parts[0],
                    right: *part,
                },
            )?;
        }
        Ok(DomainSpec {
            primary: Some(Domain::WholeCell),
            secondary,
        })
    }
}

/// `Some(merged)` when compatible, `None` on conflict.
fn merge_slot(a: Option<Domain>, b: Option<Domain>) -> Option<Option<Domain>> {
    match (a, b) {
        (None, x) | (x, None) => Some(x),
        (Some(x), Some(y)) if x == y => Some(Some(x)),
        _ => None,
    }
}

impl fmt::Display for DomainSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.primary, self.secondary) {
            (None, _) => f.write_str("uniform"),
            (Some(p), None) => write!(f, "{p}"),
            (Some(p), Some(s)) => write!(f, "{p} (secondary: {s})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_adopts_other_domain() {
        let n = DomainSpec::on(Domain::NegativeElectrode);
        assert_eq!(DomainSpec::uniform().combine(n, "add").unwrap(), n);
        assert_eq!(n.combine(DomainSpec::uniform(), "add").unwrap(), n);
    }

    #[test]
    fn mismatched_primaries_fail() {
        let n = DomainSpec::on(Domain::NegativeElectrode);
        let p = DomainSpec::on(Domain::PositiveElectrode);
        let err = n.combine(p, "add").unwrap_err();
        assert!(matches!(err, CoreError::DomainMismatch { context: "add", .. }));
    }

    #[test]
    fn broadcast_keeps_current_collector_as_secondary() {
        let cc = DomainSpec::on(Domain::CurrentCollector);
        let b = cc.broadcast_to(Domain::NegativeElectrode).unwrap();
        assert_eq!(
            b,
            DomainSpec::with_secondary(Domain::NegativeElectrode, Domain::CurrentCollector)
        );
        assert_eq!(b.x_averaged().unwrap(), cc);
    }

    #[test]
    fn broadcast_of_electrode_field_is_rejected() {
        let n = DomainSpec::on(Domain::NegativeElectrode);
        assert!(n.broadcast_to(Domain::PositiveElectrode).is_err());
    }

    #[test]
    fn concatenation_requires_cell_order() {
        let parts = Domain::CELL_REGIONS.map(DomainSpec::on);
        assert_eq!(
            DomainSpec::concatenate(&parts).unwrap().primary,
            Some(Domain::WholeCell)
        );

        let swapped = [parts[1], parts[0], parts[2]];
        assert!(matches!(
            DomainSpec::concatenate(&swapped),
            Err(CoreError::ConcatenationOrder { index: 0, .. })
        ));
        assert!(DomainSpec::concatenate(&parts[..2]).is_err());
    }

    #[test]
    fn boundary_value_of_uniform_is_rejected() {
        assert!(DomainSpec::uniform().at_boundary().is_err());
        let cc = DomainSpec::on(Domain::CurrentCollector);
        assert_eq!(cc.at_boundary().unwrap(), DomainSpec::uniform());
    }
}
