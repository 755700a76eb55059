//! Projection of query points onto network segments

use geo::{Coord, Line, LineLocatePoint, Point};
use itertools::Itertools;
use log::warn;
use rstar::{RTree, primitives::GeomWithData};

use crate::{Error, model::LineLayer};

/// Straight piece of a line feature
#[derive(Debug, Clone, Copy)]
pub(crate) struct Segment {
    pub(crate) feature: usize,
    pub(crate) line: Line<f64>,
}

/// Position of a query point along a segment
#[derive(Debug, Clone, Copy)]
pub(crate) struct Tie {
    /// Fraction of the segment length from its start
    pub(crate) fraction: f64,
    pub(crate) coord: Coord<f64>,
}

type IndexedSegment = GeomWithData<rstar::primitives::Line<[f64; 2]>, usize>;

/// Splits every usable feature into straight segments in digitized order.
///
/// Features without a usable geometry are skipped with a warning. Zero-length
/// segments carry no travel and are dropped.
pub(crate) fn collect_segments(layer: &LineLayer) -> Vec<Segment> {
    let mut segments = Vec::new();
    for (index, feature) in layer.features.iter().enumerate() {
        if !feature.has_valid_geometry() {
            warn!("Skipping line feature {index}: geometry is empty or invalid");
            continue;
        }

        for part in &feature.geometry.0 {
            if part.0.iter().any(|c| !(c.x.is_finite() && c.y.is_finite())) {
                warn!("Skipping part of line feature {index}: non-finite coordinates");
                continue;
            }
            segments.extend(
                part.lines()
                    .filter(|line| line.start != line.end)
                    .map(|line| Segment {
                        feature: index,
                        line,
                    }),
            );
        }
    }
    segments
}

/// Ties each query coordinate to its nearest segment.
///
/// Returns the ties grouped per segment (sorted along the segment) and the
/// projected location of every query coordinate in input order.
pub(crate) fn tie_points(
    segments: &[Segment],
    points: &[Coord<f64>],
) -> Result<(Vec<Vec<Tie>>, Vec<Coord<f64>>), Error> {
    let mut per_segment: Vec<Vec<Tie>> = vec![Vec::new(); segments.len()];
    if points.is_empty() {
        return Ok((per_segment, Vec::new()));
    }

    let rtree = RTree::bulk_load(
        segments
            .iter()
            .enumerate()
            .map(|(i, segment)| {
                let line = rstar::primitives::Line::new(
                    [segment.line.start.x, segment.line.start.y],
                    [segment.line.end.x, segment.line.end.y],
                );
                IndexedSegment::new(line, i)
            })
            .collect(),
    );

    let mut snapped = Vec::with_capacity(points.len());
    for point in points {
        let query = [point.x, point.y];
        let nearest = rtree
            .nearest_neighbor(&query)
            .ok_or(Error::NoPointsFound)?;

        let segment = segments[nearest.data].line;
        let fraction = segment
            .line_locate_point(&Point::from(*point))
            .unwrap_or(0.0)
            .clamp(0.0, 1.0);
        let coord = segment.start + segment.delta() * fraction;

        per_segment[nearest.data].push(Tie { fraction, coord });
        snapped.push(coord);
    }

    for ties in &mut per_segment {
        ties.sort_by(|a, b| a.fraction.total_cmp(&b.fraction));
    }

    Ok((per_segment, snapped))
}

/// Coordinates of a segment with its ties inserted, in travel order
pub(crate) fn split_coords(segment: &Segment, ties: &[Tie]) -> Vec<Coord<f64>> {
    std::iter::once(segment.line.start)
        .chain(ties.iter().map(|tie| tie.coord))
        .chain(std::iter::once(segment.line.end))
        .dedup()
        .collect()
}

#[cfg(test)]
mod tests {
    use geo::{MultiLineString, coord, line_string};

    use super::*;
    use crate::model::{Crs, FieldSchema, LineFeature};

    fn layer() -> LineLayer {
        LineLayer::new(
            FieldSchema::default(),
            vec![
                LineFeature::new(
                    MultiLineString::new(vec![
                        line_string![(x: 0., y: 0.), (x: 100., y: 0.), (x: 100., y: 0.)],
                    ]),
                    vec![],
                ),
                LineFeature::new(MultiLineString::new(vec![]), vec![]),
                LineFeature::new(
                    MultiLineString::new(vec![line_string![(x: 0., y: 10.), (x: 0., y: 110.)]]),
                    vec![],
                ),
            ],
            Crs::default(),
        )
    }

    #[test]
    fn skips_invalid_features_and_degenerate_segments() {
        let segments = collect_segments(&layer());
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].feature, 0);
        assert_eq!(segments[1].feature, 2);
    }

    #[test]
    fn projects_onto_nearest_segment() {
        let segments = collect_segments(&layer());
        let (ties, snapped) = tie_points(
            &segments,
            &[coord! {x: 60., y: -20.}, coord! {x: 30., y: 5.}],
        )
        .unwrap();

        assert_eq!(snapped, vec![coord! {x: 60., y: 0.}, coord! {x: 30., y: 0.}]);
        assert_eq!(ties[0].len(), 2);
        assert!(ties[0][0].fraction < ties[0][1].fraction);

        let coords = split_coords(&segments[0], &ties[0]);
        assert_eq!(coords.len(), 4);
        assert_eq!(coords[1], coord! {x: 30., y: 0.});
    }

    #[test]
    fn ties_at_segment_ends_do_not_duplicate_coordinates() {
        let segments = collect_segments(&layer());
        let (ties, _) = tie_points(&segments, &[coord! {x: -5., y: -5.}]).unwrap();
        assert_eq!(split_coords(&segments[0], &ties[0]).len(), 2);
    }
}
