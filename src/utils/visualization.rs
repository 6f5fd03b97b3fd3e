//! Visualization utilities for kinodynamic_robots
//!
//! Plots vehicle footprints, obstacles and trajectories with gnuplot.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth};

use crate::common::{Point2D, Pose2D, RoboticsError, RoboticsResult};
use crate::kinodynamics::{ObstacleEnvironment, Robot, VehicleState};

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const BLUE: &str = "#0000FF";
    pub const CYAN: &str = "#00FFFF";
    pub const ORANGE: &str = "#FFA500";

    // Semantic colors
    pub const OBSTACLE: &str = BLACK;
    pub const PATH: &str = RED;
    pub const TRACTOR: &str = BLUE;
    pub const TRAILER: &str = ORANGE;
}

/// Style for line rendering
#[derive(Debug, Clone)]
pub struct PathStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: String,
}

impl PathStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            line_width: 2.0,
            caption: caption.to_string(),
        }
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            color: colors::PATH.to_string(),
            line_width: 2.0,
            caption: "Path".to_string(),
        }
    }
}

struct Series {
    x: Vec<f64>,
    y: Vec<f64>,
    color: String,
    line_width: f64,
    caption: String,
}

/// Main visualizer struct
///
/// Series are buffered and drawn into a single set of axes when the figure
/// is shown or saved.
pub struct Visualizer {
    figure: Figure,
    title: String,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
    series: Vec<Series>,
    // Captions already shown in the legend
    captions: Vec<String>,
}

impl Visualizer {
    /// Create a new visualizer
    pub fn new() -> Self {
        Self {
            figure: Figure::new(),
            title: String::new(),
            x_range: None,
            y_range: None,
            series: Vec::new(),
            captions: Vec::new(),
        }
    }

    /// Set the plot title
    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    /// Set X axis range
    pub fn set_x_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.x_range = Some((min, max));
        self
    }

    /// Set Y axis range
    pub fn set_y_range(&mut self, min: f64, max: f64) -> &mut Self {
        self.y_range = Some((min, max));
        self
    }

    fn legend_entry(&mut self, caption: &str) -> String {
        if caption.is_empty() || self.captions.iter().any(|c| c == caption) {
            return String::new();
        }
        self.captions.push(caption.to_string());
        caption.to_string()
    }

    /// Plot a polyline from x,y vectors
    pub fn plot_path_xy(&mut self, x: &[f64], y: &[f64], style: &PathStyle) -> &mut Self {
        let caption = self.legend_entry(&style.caption);
        self.series.push(Series {
            x: x.to_vec(),
            y: y.to_vec(),
            color: style.color.clone(),
            line_width: style.line_width,
            caption,
        });
        self
    }

    /// Plot a closed polygon outline
    pub fn plot_polygon(&mut self, corners: &[Point2D], style: &PathStyle) -> &mut Self {
        let x: Vec<f64> = corners.iter().map(|p| p.x).collect();
        let y: Vec<f64> = corners.iter().map(|p| p.y).collect();
        self.plot_path_xy(&x, &y, style)
    }

    /// Plot the footprint of every part of `robot` at `state`
    pub fn plot_robot(&mut self, robot: &dyn Robot, state: &VehicleState, line_width: f64) -> &mut Self {
        for part in 0..robot.num_parts() {
            let pose = robot.get_transform(state, part);
            let outline = robot.geometry().footprint(part, &pose);
            let style = if part == 0 {
                PathStyle::new(colors::TRACTOR, "Tractor")
            } else {
                PathStyle::new(colors::TRAILER, "Trailer")
            };
            self.plot_polygon(&outline, &style.with_line_width(line_width));
        }
        self
    }

    /// Plot the ground outline of every box obstacle
    pub fn plot_obstacles(&mut self, env: &ObstacleEnvironment) -> &mut Self {
        for obstacle in env.obstacles() {
            if let Some(cuboid) = obstacle.shape().as_cuboid() {
                let he = cuboid.half_extents;
                let pose = Pose2D::from_isometry(obstacle.pose());
                let (c, s) = (pose.yaw.cos(), pose.yaw.sin());
                let corners: Vec<Point2D> = [(he.x, he.y), (-he.x, he.y), (-he.x, -he.y), (he.x, -he.y), (he.x, he.y)]
                    .iter()
                    .map(|&(dx, dy)| Point2D::new(pose.x + c * dx - s * dy, pose.y + s * dx + c * dy))
                    .collect();
                self.plot_polygon(&corners, &PathStyle::new(colors::OBSTACLE, "Obstacles"));
            }
        }
        self
    }

    /// Finalize and show the plot
    pub fn show(&mut self) -> RoboticsResult<()> {
        self.render();
        self.figure
            .show()
            .map(|_| ())
            .map_err(|e| RoboticsError::VisualizationError(e.to_string()))
    }

    /// Save plot to PNG file
    pub fn save_png(&mut self, path: &str, width: u32, height: u32) -> RoboticsResult<()> {
        self.render();
        self.figure
            .save_to_png(path, width, height)
            .map_err(|e| RoboticsError::VisualizationError(e.to_string()))
    }

    /// Number of buffered line series
    pub fn num_series(&self) -> usize {
        self.series.len()
    }

    fn render(&mut self) {
        self.figure.clear_axes();
        let axes = self.figure.axes2d();

        for s in &self.series {
            axes.lines(
                &s.x,
                &s.y,
                &[Caption(&s.caption), Color(&s.color), LineWidth(s.line_width)],
            );
        }

        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_label("X [m]", &[]);
        axes.set_y_label("Y [m]", &[]);

        if let Some((min, max)) = self.x_range {
            axes.set_x_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some((min, max)) = self.y_range {
            axes.set_y_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        axes.set_aspect_ratio(AutoOption::Fix(1.0));
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_style() {
        let style = PathStyle::new(colors::RED, "Test Path").with_line_width(3.0);
        assert_eq!(style.line_width, 3.0);
        assert_eq!(style.color, colors::RED);
    }

    #[test]
    fn test_legend_entries_are_unique() {
        let mut vis = Visualizer::new();
        assert_eq!(vis.legend_entry("Trailer"), "Trailer");
        assert_eq!(vis.legend_entry("Trailer"), "");
        assert_eq!(vis.legend_entry(""), "");
    }

    #[test]
    fn test_robot_footprints_are_buffered() {
        use crate::common::RealVectorBounds;
        use crate::kinodynamics::create_robot;

        let bounds = RealVectorBounds::planar(-5.0, 5.0, -5.0, 5.0).unwrap();
        let robot = create_robot("car_first_order_with_2_trailers_0", &bounds).unwrap();
        let mut env = ObstacleEnvironment::new();
        env.add_box(1.0, 1.0, 0.3, nalgebra::Vector3::new(1.0, 0.5, 1.0));

        let mut vis = Visualizer::new();
        vis.plot_robot(robot.as_ref(), &robot.alloc_state(), 1.0)
            .plot_obstacles(&env);
        assert_eq!(vis.num_series(), 4);
    }
}
