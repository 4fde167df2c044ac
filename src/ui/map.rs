use std::collections::BTreeMap;

use eframe::egui::{Color32, Mesh, Pos2, Shape, Stroke, Ui};
use egui_plot::{Plot, PlotPoint, PlotTransform};

use crate::data::boundary::{BoundaryCatalog, Ring};
use crate::data::filter::DisplayValue;
use crate::data::model::CountyId;
use crate::present;
use crate::state::AppState;

const OUTLINE: Color32 = Color32::from_gray(90);
const HOVER_OUTLINE: Color32 = Color32::WHITE;

/// A triangle of `[lon, lat]` corners.
pub type Triangle = [[f64; 2]; 3];

// ---------------------------------------------------------------------------
// Map geometry, triangulated once per store
// ---------------------------------------------------------------------------

/// Fill triangles per county plus the lon/lat extent of all outlines.
#[derive(Debug, Clone, Default)]
pub struct MapGeometry {
    fills: BTreeMap<CountyId, Vec<Triangle>>,
    bounds: Option<([f64; 2], [f64; 2])>,
}

impl MapGeometry {
    pub fn new(boundaries: &BoundaryCatalog) -> Self {
        let mut bounds: Option<([f64; 2], [f64; 2])> = None;
        let mut fills = BTreeMap::new();
        for (id, shape) in boundaries.iter() {
            for point in shape.polygons.iter().flatten().flatten() {
                let (lo, hi) = bounds.get_or_insert((*point, *point));
                for axis in 0..2 {
                    lo[axis] = lo[axis].min(point[axis]);
                    hi[axis] = hi[axis].max(point[axis]);
                }
            }
            let triangles: Vec<Triangle> = shape
                .polygons
                .iter()
                .flat_map(|polygon| triangulate(polygon))
                .collect();
            fills.insert(id.clone(), triangles);
        }
        MapGeometry { fills, bounds }
    }

    pub fn fill(&self, id: &CountyId) -> &[Triangle] {
        self.fills.get(id).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Split one polygon (exterior ring, then holes) into triangles.
///
/// Works for concave rings. A polygon that cannot be triangulated yields no
/// triangles and is drawn as an outline only.
pub fn triangulate(polygon: &[Ring]) -> Vec<Triangle> {
    let mut coords = Vec::new();
    let mut holes = Vec::new();
    for (i, ring) in polygon.iter().enumerate() {
        // The closing point repeats the first one.
        let open = match ring.split_last() {
            Some((last, rest)) if ring.len() > 1 && *last == ring[0] => rest,
            _ => ring.as_slice(),
        };
        if i > 0 {
            holes.push(coords.len() / 2);
        }
        coords.extend(open.iter().flatten());
    }

    let indices = match earcutr::earcut(&coords, &holes, 2) {
        Ok(indices) => indices,
        Err(e) => {
            log::warn!("could not triangulate outline: {e:?}");
            return Vec::new();
        }
    };
    let corner = |i: usize| [coords[2 * i], coords[2 * i + 1]];
    indices
        .chunks_exact(3)
        .map(|t| [corner(t[0]), corner(t[1]), corner(t[2])])
        .collect()
}

// ---------------------------------------------------------------------------
// Choropleth (central panel)
// ---------------------------------------------------------------------------

/// Render the county map. Counties without both a record and an outline are
/// left out. Eligible counties are filled; the rest get an outline only.
pub fn choropleth(ui: &mut Ui, state: &mut AppState, geometry: &MapGeometry) {
    let boundaries = state.store.boundaries();
    let Some((lo, hi)) = geometry.bounds else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No county outlines loaded.");
        });
        return;
    };

    let response = Plot::new("county_map")
        // One degree of longitude is shorter than one of latitude at US latitudes.
        .data_aspect(1.3)
        .include_x(lo[0])
        .include_x(hi[0])
        .include_y(lo[1])
        .include_y(hi[1])
        .show_axes(false)
        .show_grid(false)
        .show_x(false)
        .show_y(false)
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            plot_ui
                .pointer_coordinate()
                .and_then(|p| county_at(boundaries, [p.x, p.y]))
        });

    let transform = response.transform;
    let to_screen = |[x, y]: [f64; 2]| transform.position_from_point(&PlotPoint::new(x, y));
    let painter = ui.painter_at(response.response.rect);

    let mut mesh = Mesh::default();
    let mut outlines = Vec::new();
    for (id, shape) in boundaries.iter() {
        let Some(value) = state.evaluation.get(id) else {
            continue;
        };
        if let Some(fill) = state.color_scale.color_for(value) {
            add_triangles(&mut mesh, geometry.fill(id), fill, &transform);
        }
        let stroke = if state.hovered.as_ref() == Some(id) {
            Stroke::new(2.0, HOVER_OUTLINE)
        } else {
            Stroke::new(0.5, OUTLINE)
        };
        for ring in shape.polygons.iter().flatten() {
            let points: Vec<Pos2> = ring.iter().copied().map(to_screen).collect();
            outlines.push(Shape::line(points, stroke));
        }
    }
    painter.add(Shape::mesh(mesh));
    painter.extend(outlines);

    state.hovered = response
        .inner
        .filter(|id| state.evaluation.contains_key(id));

    if let Some(id) = state.hovered.clone() {
        response.response.on_hover_ui_at_pointer(|ui: &mut Ui| {
            hover_card(ui, state, &id);
        });
    }
}

fn add_triangles(
    mesh: &mut Mesh,
    triangles: &[Triangle],
    color: Color32,
    transform: &PlotTransform,
) {
    for triangle in triangles {
        let base = mesh.vertices.len() as u32;
        for [x, y] in triangle {
            mesh.colored_vertex(transform.position_from_point(&PlotPoint::new(*x, *y)), color);
        }
        mesh.add_triangle(base, base + 1, base + 2);
    }
}

fn hover_card(ui: &mut Ui, state: &AppState, id: &CountyId) {
    let Some(record) = state.record(id) else {
        return;
    };
    let value = state
        .evaluation
        .get(id)
        .copied()
        .unwrap_or(DisplayValue::Ineligible);

    ui.strong(&record.display_name);
    ui.label(format!("FIPS {id} · {}", present::label_for(&value)));
    ui.separator();
    egui_grid(ui, &present::hover_rows(record, state.unit));
}

fn egui_grid(ui: &mut Ui, rows: &[(String, String)]) {
    eframe::egui::Grid::new("hover_rows")
        .num_columns(2)
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            for (label, value) in rows {
                ui.label(label);
                ui.label(value);
                ui.end_row();
            }
        });
}

// ---------------------------------------------------------------------------
// Hit testing
// ---------------------------------------------------------------------------

/// County whose outline contains `point`, if any.
pub fn county_at(boundaries: &BoundaryCatalog, point: [f64; 2]) -> Option<CountyId> {
    boundaries
        .iter()
        .find(|(_, shape)| {
            shape.polygons.iter().any(|rings| {
                let mut rings = rings.iter();
                rings.next().is_some_and(|outer| ring_contains(outer, point))
                    && !rings.any(|hole| ring_contains(hole, point))
            })
        })
        .map(|(id, _)| id.clone())
}

/// Even-odd ray cast.
fn ring_contains(ring: &Ring, [x, y]: [f64; 2]) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let [xi, yi] = ring[i];
        let [xj, yj] = ring[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}
