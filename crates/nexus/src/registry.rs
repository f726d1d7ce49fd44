use crate::config::{Config, RingConfig};
use derive_more::{AsRef, Deref, Display, From, Into};
use ringpath::{FULL_TURN, GeometryError, Point, Wedge};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use strum::{Display as StrumDisplay, EnumString};
use thiserror::Error;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct SectorId(String);

crate::impl_string_newtype!(SectorId);

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sector {
    pub id: SectorId,
    pub label: String,
    pub subtitle: String,
    pub description: String,
    #[serde(default)]
    pub bullets: Vec<String>,
    /// Degrees clockwise from straight up.
    pub start_angle: f64,
}

impl Sector {
    pub fn end_angle(&self, span: f64) -> f64 {
        self.start_angle + span
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumString, StrumDisplay)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum PanelSide {
    Left,
    #[default]
    Right,
}

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("no sectors configured")]
    Empty,
    #[error("sector '{0}' is defined more than once")]
    Duplicate(SectorId),
    #[error("sector '{id}' starts at {angle}, outside [0, 360)")]
    StartAngle { id: SectorId, angle: f64 },
    #[error("sectors '{first}' and '{second}' overlap")]
    Overlap { first: SectorId, second: SectorId },
    #[error("ring span must be positive, got {0}")]
    Span(f64),
    #[error("left_panel names unknown sector '{0}'")]
    UnknownLeftPanel(SectorId),
    #[error("sector '{id}': {source}")]
    Geometry {
        id: SectorId,
        #[source]
        source: GeometryError,
    },
}

/// The fixed, ordered set of menu sectors with their wedge geometry.
///
/// Built once from configuration and never mutated; a reload builds a new one.
#[derive(Debug, Clone)]
pub struct SectorRegistry {
    sectors: Vec<Sector>,
    wedges: Vec<Wedge>,
    left_panel: HashSet<SectorId>,
    ring: RingConfig,
}

impl SectorRegistry {
    pub fn from_config(config: &Config) -> Result<Self, RegistryError> {
        Self::new(
            config.sectors.clone(),
            config.left_panel.iter().cloned(),
            config.ring,
        )
    }

    pub fn new(
        sectors: Vec<Sector>,
        left_panel: impl IntoIterator<Item = SectorId>,
        ring: RingConfig,
    ) -> Result<Self, RegistryError> {
        if sectors.is_empty() {
            return Err(RegistryError::Empty);
        }
        // Overlap checking walks wedges clockwise from their start.
        if ring.span.is_nan() || ring.span <= 0.0 {
            return Err(RegistryError::Span(ring.span));
        }

        let mut seen = HashSet::new();
        for sector in &sectors {
            if !seen.insert(&sector.id) {
                return Err(RegistryError::Duplicate(sector.id.clone()));
            }
            if !(0.0..FULL_TURN).contains(&sector.start_angle) {
                return Err(RegistryError::StartAngle {
                    id: sector.id.clone(),
                    angle: sector.start_angle,
                });
            }
        }

        let left_panel: HashSet<SectorId> = left_panel.into_iter().collect();
        if let Some(unknown) = left_panel.iter().find(|id| !seen.contains(id)) {
            return Err(RegistryError::UnknownLeftPanel(unknown.clone()));
        }

        let wedges = sectors
            .iter()
            .map(|s| {
                Wedge::new(
                    ring.center,
                    ring.inner_radius,
                    ring.outer_radius,
                    s.start_angle,
                    s.end_angle(ring.span),
                )
                .map_err(|source| RegistryError::Geometry {
                    id: s.id.clone(),
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        check_overlaps(&sectors, ring.span)?;

        Ok(Self {
            sectors,
            wedges,
            left_panel,
            ring,
        })
    }

    pub fn ring(&self) -> &RingConfig {
        &self.ring
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Sector, &Wedge)> {
        self.sectors.iter().zip(&self.wedges)
    }

    fn position(&self, id: &SectorId) -> Option<usize> {
        self.sectors.iter().position(|s| &s.id == id)
    }

    pub fn contains(&self, id: &SectorId) -> bool {
        self.position(id).is_some()
    }

    pub fn get(&self, id: &SectorId) -> Option<&Sector> {
        self.position(id).map(|i| &self.sectors[i])
    }

    pub fn wedge(&self, id: &SectorId) -> Option<&Wedge> {
        self.position(id).map(|i| &self.wedges[i])
    }

    pub fn panel_side(&self, id: &SectorId) -> PanelSide {
        if self.left_panel.contains(id) {
            PanelSide::Left
        } else {
            PanelSide::Right
        }
    }

    /// The sector whose wedge contains `point`, if any.
    pub fn hit_test(&self, point: Point) -> Option<&SectorId> {
        self.iter()
            .find(|(_, wedge)| wedge.contains_point(point))
            .map(|(sector, _)| &sector.id)
    }
}

/// Walks the sectors in angular order, including the wrap back to the first.
fn check_overlaps(sectors: &[Sector], span: f64) -> Result<(), RegistryError> {
    if sectors.len() < 2 {
        return Ok(());
    }

    let mut ordered: Vec<&Sector> = sectors.iter().collect();
    ordered.sort_by(|a, b| a.start_angle.total_cmp(&b.start_angle));

    for (i, current) in ordered.iter().enumerate() {
        let next = ordered[(i + 1) % ordered.len()];
        let next_start = if i + 1 == ordered.len() {
            next.start_angle + FULL_TURN
        } else {
            next.start_angle
        };
        if current.end_angle(span) > next_start {
            return Err(RegistryError::Overlap {
                first: current.id.clone(),
                second: next.id.clone(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ringpath::polar_to_cartesian;

    fn sector(id: &str, start_angle: f64) -> Sector {
        Sector {
            id: SectorId::new(id),
            label: id.to_uppercase(),
            subtitle: String::new(),
            description: String::new(),
            bullets: Vec::new(),
            start_angle,
        }
    }

    fn builtin() -> SectorRegistry {
        SectorRegistry::from_config(&Config::builtin().unwrap()).unwrap()
    }

    #[test]
    fn test_builtin_registry_is_valid() {
        let registry = builtin();
        assert_eq!(registry.len(), 6);
        let neural = registry.wedge(&SectorId::new("neural")).unwrap();
        assert_eq!(neural.start(), 332.0);
        assert_eq!(neural.end(), 388.0);
    }

    #[test]
    fn test_builtin_gaps_are_uniform() {
        let registry = builtin();
        let mut starts: Vec<f64> = registry.iter().map(|(s, _)| s.start_angle).collect();
        starts.sort_by(f64::total_cmp);
        for (i, start) in starts.iter().enumerate() {
            let next = starts
                .get(i + 1)
                .copied()
                .unwrap_or(starts[0] + FULL_TURN);
            assert_eq!(next - (start + 56.0), 4.0);
        }
    }

    #[test]
    fn test_panel_side_membership() {
        let registry = builtin();
        for id in ["synth", "vector", "aero"] {
            assert_eq!(registry.panel_side(&SectorId::new(id)), PanelSide::Left);
        }
        for id in ["neural", "quantum", "iso", "missing"] {
            assert_eq!(registry.panel_side(&SectorId::new(id)), PanelSide::Right);
        }
    }

    #[test]
    fn test_hit_test() {
        let registry = builtin();
        let ring = *registry.ring();
        let at = |angle| polar_to_cartesian(ring.center, 260.0, angle);

        assert_eq!(registry.hit_test(at(0.0)), Some(&SectorId::new("neural")));
        assert_eq!(registry.hit_test(at(60.0)), Some(&SectorId::new("quantum")));
        assert_eq!(registry.hit_test(at(300.0)), Some(&SectorId::new("aero")));
        // the 4 degree gap between neural and quantum
        assert_eq!(registry.hit_test(at(30.0)), None);
        assert_eq!(registry.hit_test(ring.center), None);
    }

    #[test]
    fn test_rejects_invalid_sets() {
        let ring = Config::builtin().unwrap().ring;

        assert_eq!(
            SectorRegistry::new(Vec::new(), [], ring).unwrap_err(),
            RegistryError::Empty
        );
        assert_eq!(
            SectorRegistry::new(vec![sector("a", 0.0), sector("a", 90.0)], [], ring).unwrap_err(),
            RegistryError::Duplicate(SectorId::new("a"))
        );
        assert!(matches!(
            SectorRegistry::new(vec![sector("a", 360.0)], [], ring).unwrap_err(),
            RegistryError::StartAngle { .. }
        ));
        assert_eq!(
            SectorRegistry::new(vec![sector("a", 0.0), sector("b", 50.0)], [], ring).unwrap_err(),
            RegistryError::Overlap {
                first: SectorId::new("a"),
                second: SectorId::new("b")
            }
        );
        assert_eq!(
            SectorRegistry::new(vec![sector("a", 330.0), sector("b", 20.0)], [], ring)
                .unwrap_err(),
            RegistryError::Overlap {
                first: SectorId::new("a"),
                second: SectorId::new("b")
            }
        );
        assert_eq!(
            SectorRegistry::new(vec![sector("a", 0.0)], [SectorId::new("z")], ring).unwrap_err(),
            RegistryError::UnknownLeftPanel(SectorId::new("z"))
        );
    }

    #[test]
    fn test_rejects_full_turn_span() {
        let mut ring = Config::builtin().unwrap().ring;
        ring.span = 360.0;
        assert!(matches!(
            SectorRegistry::new(vec![sector("a", 0.0)], [], ring).unwrap_err(),
            RegistryError::Geometry {
                source: GeometryError::FullTurn(_),
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_non_positive_span() {
        let mut ring = Config::builtin().unwrap().ring;
        for span in [-56.0, 0.0, f64::NAN] {
            ring.span = span;
            let err = SectorRegistry::new(vec![sector("a", 0.0), sector("b", 30.0)], [], ring)
                .unwrap_err();
            assert!(matches!(err, RegistryError::Span(_)), "{span}: {err:?}");
        }
    }

    #[test]
    fn test_panel_side_parsing() {
        assert_eq!("LEFT".parse::<PanelSide>().unwrap(), PanelSide::Left);
        assert_eq!(PanelSide::Right.to_string(), "right");
    }
}
