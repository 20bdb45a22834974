//! SVG drawing of a decision tree with plotters.
use super::layout::{NodeKind, TreeLayout};
use crate::data::dataset::Category;
use crate::error::TreeError;
use crate::trees::node::DecisionTree;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontDesc, FontFamily, FontStyle, TextStyle};
use std::path::Path;
use tracing::{info, instrument};

const DECISION_FILL: RGBColor = RGBColor(204, 204, 204);

/// Canvas settings for [`render_svg`].
#[derive(Clone, Debug)]
pub struct PlotParams {
    width: u32,
    height: u32,
    margin: u32,
    font_size: f64,
}

impl Default for PlotParams {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotParams {
    pub fn new() -> Self {
        Self {
            width: 800,
            height: 600,
            margin: 60,
            font_size: 14.0,
        }
    }

    /// Sets the canvas size in pixels.
    ///
    /// # Errors
    ///
    /// Both sides must leave room for the margin on either edge.
    pub fn set_size(&mut self, width: u32, height: u32) -> Result<(), TreeError> {
        let border = self.margin.saturating_mul(2);
        if width <= border || height <= border {
            return Err(TreeError::InvalidParam {
                name: "size",
                reason: format!(
                    "{width}x{height} leaves no room inside a {} px margin",
                    self.margin
                ),
            });
        }
        self.width = width;
        self.height = height;
        Ok(())
    }

    /// Sets the blank border around the drawing.
    pub fn set_margin(&mut self, margin: u32) -> Result<(), TreeError> {
        if margin.saturating_mul(2) >= self.width.min(self.height) {
            return Err(TreeError::InvalidParam {
                name: "margin",
                reason: format!("{margin} px is too wide for a {}x{} canvas", self.width, self.height),
            });
        }
        self.margin = margin;
        Ok(())
    }

    pub fn set_font_size(&mut self, font_size: f64) -> Result<(), TreeError> {
        if !(font_size.is_finite() && font_size > 0.0) {
            return Err(TreeError::InvalidParam {
                name: "font_size",
                reason: format!("{font_size} is not a positive size"),
            });
        }
        self.font_size = font_size;
        Ok(())
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn margin(&self) -> u32 {
        self.margin
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    /// Maps a unit-square point (y up) to a pixel (y down).
    fn to_pixel(&self, (x, y): (f64, f64)) -> (i32, i32) {
        let margin = self.margin as f64;
        let inner_w = self.width as f64 - 2.0 * margin;
        let inner_h = self.height as f64 - 2.0 * margin;
        (
            (margin + x * inner_w).round() as i32,
            (margin + (1.0 - y) * inner_h).round() as i32,
        )
    }
}

fn render_error(err: impl std::fmt::Display) -> TreeError {
    TreeError::Render {
        reason: err.to_string(),
    }
}

/// Draws `tree` as an SVG document: decision nodes as shaded boxes, leaves
/// as outlined boxes, and each edge labelled with its branch value.
///
/// # Errors
///
/// Returns [`TreeError::Render`] if the backend fails.
#[instrument(skip_all, fields(leaves = tree.leaf_count(), depth = tree.depth()))]
pub fn render_svg<V: Category, L: Category>(
    tree: &DecisionTree<V, L>,
    params: &PlotParams,
) -> Result<String, TreeError> {
    let layout = TreeLayout::new(tree);
    let centred = TextStyle::from(FontDesc::new(
        FontFamily::SansSerif,
        params.font_size,
        FontStyle::Normal,
    ))
    .pos(Pos::new(HPos::Center, VPos::Center));

    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, params.size()).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        for edge in &layout.edges {
            let parent = &layout.nodes[edge.parent];
            let child = &layout.nodes[edge.child];
            let from = params.to_pixel((parent.x, parent.y));
            let to = params.to_pixel((child.x, child.y));
            root.draw(&PathElement::new(vec![from, to], BLACK.stroke_width(1)))
                .map_err(render_error)?;

            let label_at = params.to_pixel(layout.edge_midpoint(edge));
            root.draw(&Text::new(edge.label.clone(), label_at, centred.clone()))
                .map_err(render_error)?;
        }

        let half_h = (params.font_size * 0.9).ceil() as i32;
        for node in &layout.nodes {
            let (cx, cy) = params.to_pixel((node.x, node.y));
            let half_w = (node.text.chars().count() as f64 * params.font_size * 0.3).ceil() as i32 + 6;
            let corners = [(cx - half_w, cy - half_h), (cx + half_w, cy + half_h)];

            let fill = match node.kind {
                NodeKind::Decision => DECISION_FILL.filled(),
                NodeKind::Leaf => WHITE.filled(),
            };
            root.draw(&Rectangle::new(corners, fill)).map_err(render_error)?;
            root.draw(&Rectangle::new(corners, BLACK.stroke_width(1)))
                .map_err(render_error)?;
            root.draw(&Text::new(node.text.clone(), (cx, cy), centred.clone()))
                .map_err(render_error)?;
        }

        root.present().map_err(render_error)?;
    }

    Ok(svg)
}

/// Renders `tree` with [`render_svg`] and writes the document to `path`.
///
/// # Errors
///
/// Returns [`TreeError::Render`] if drawing fails and
/// [`TreeError::WriteFile`] if the file can't be written.
#[instrument(skip(tree, params), fields(path = %path.as_ref().display()))]
pub fn save_svg<V: Category, L: Category>(
    tree: &DecisionTree<V, L>,
    path: impl AsRef<Path>,
    params: &PlotParams,
) -> Result<(), TreeError> {
    let path = path.as_ref();
    let svg = render_svg(tree, params)?;
    std::fs::write(path, svg.as_bytes()).map_err(|e| TreeError::WriteFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    info!(size_bytes = svg.len(), "tree drawing saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trees::node::tests::fish_tree;
    use tempfile::TempDir;

    #[test]
    fn test_render_contains_every_label() {
        let svg = render_svg(&fish_tree(), &PlotParams::default()).unwrap();
        assert!(svg.contains("<svg"));
        for text in ["no surfacing", "flippers", "yes"] {
            assert!(svg.contains(text), "missing {text}");
        }
        // five node captions and four branch values
        assert_eq!(svg.matches("<text").count(), 9);
    }

    #[test]
    fn test_render_single_leaf() {
        let tree: DecisionTree<i32, &str> = DecisionTree::Leaf("soft");
        let svg = render_svg(&tree, &PlotParams::default()).unwrap();
        assert!(svg.contains("soft"));
    }

    #[test]
    fn test_pixel_mapping() {
        let params = PlotParams::default();
        assert_eq!(params.to_pixel((0.0, 1.0)), (60, 60));
        assert_eq!(params.to_pixel((1.0, 0.0)), (740, 540));
        assert_eq!(params.to_pixel((0.5, 0.5)), (400, 300));
    }

    #[test]
    fn test_param_validation() {
        let mut params = PlotParams::new();
        assert!(params.set_size(100, 100).is_err());
        assert!(params.set_margin(400).is_err());
        assert!(params.set_margin(u32::MAX / 2 + 1).is_err());
        assert!(params.set_margin(u32::MAX).is_err());
        assert!(params.set_font_size(0.0).is_err());
        assert!(params.set_font_size(f64::NAN).is_err());
        params.set_size(1024, 768).unwrap();
        params.set_margin(20).unwrap();
        params.set_font_size(10.0).unwrap();
        assert_eq!(params.size(), (1024, 768));
        assert_eq!(params.margin(), 20);
    }

    #[test]
    fn test_huge_margin_keeps_previous() {
        let mut params = PlotParams::new();
        let err = params.set_margin(u32::MAX / 2 + 1).unwrap_err();
        assert!(matches!(err, TreeError::InvalidParam { name: "margin", .. }));
        assert_eq!(params.margin(), 60);
        assert!(params.set_size(u32::MAX, u32::MAX).is_ok());
    }

    #[test]
    fn test_save_svg() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tree.svg");
        save_svg(&fish_tree(), &path, &PlotParams::default()).unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("flippers"));
    }
}
