//! Modelo de coordenadas del plano.
//!
//! Las mesas guardan su posición normalizada en `[0, 1]` respecto al tamaño del
//! contenedor, de modo que el plano es independiente de la resolución. Aquí viven
//! las conversiones a píxeles y el recorte que mantiene la huella completa de la
//! mesa dentro del contenedor.

use serde::{Deserialize, Serialize};

use crate::models::TableVariant;

/// Lado de una mesa estándar como fracción del ancho del contenedor (50px sobre 1200px)
pub const TABLE_EDGE_RATIO: f64 = 1.0 / 24.0;

/// Posición absoluta en píxeles, relativa al origen del contenedor
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl std::ops::Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Posición normalizada, `x, y ∈ [0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub x: f64,
    pub y: f64,
}

impl NormalizedPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Dimensiones actuales del contenedor del plano
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Container {
    pub width: f64,
    pub height: f64,
}

impl Container {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Un contenedor sin área no admite conversiones útiles
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Huella dibujada de una mesa de la variante dada
    pub fn footprint(&self, variant: TableVariant) -> Size {
        let edge = self.width * TABLE_EDGE_RATIO;
        let (w, h) = variant.footprint_multiplier();
        Size {
            width: edge * w,
            height: edge * h,
        }
    }

    pub fn to_absolute(&self, position: NormalizedPoint) -> Point {
        Point::new(position.x * self.width, position.y * self.height)
    }

    /// Un eje de tamaño cero se traduce en 0 en lugar de dividir por cero
    pub fn to_normalized(&self, point: Point) -> NormalizedPoint {
        NormalizedPoint::new(ratio(point.x, self.width), ratio(point.y, self.height))
    }

    /// Recorta una posición absoluta para que la huella completa quede dentro
    pub fn clamp(&self, point: Point, variant: TableVariant) -> Point {
        let footprint = self.footprint(variant);
        let max_x = (self.width - footprint.width).max(0.0);
        let max_y = (self.height - footprint.height).max(0.0);

        Point::new(point.x.clamp(0.0, max_x), point.y.clamp(0.0, max_y))
    }
}

fn ratio(value: f64, extent: f64) -> f64 {
    if extent > 0.0 {
        value / extent
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn assert_close(a: Point, b: Point) {
        assert!((a.x - b.x).abs() < EPSILON, "{a:?} != {b:?}");
        assert!((a.y - b.y).abs() < EPSILON, "{a:?} != {b:?}");
    }

    #[test]
    fn round_trip_is_stable() {
        let containers = [
            Container::new(1200.0, 700.0),
            Container::new(333.3, 977.1),
            Container::new(1.0, 1.0),
        ];
        let positions = [
            NormalizedPoint::new(0.0, 0.0),
            NormalizedPoint::new(0.37, 0.91),
            NormalizedPoint::new(1.0, 1.0),
        ];

        for container in containers {
            for position in positions {
                let absolute = container.to_absolute(position);
                let again = container.to_absolute(container.to_normalized(absolute));
                assert_close(again, absolute);
            }
        }
    }

    #[test]
    fn degenerate_container_maps_to_origin() {
        let container = Container::new(0.0, 0.0);

        assert!(container.is_degenerate());
        assert_eq!(
            container.to_absolute(NormalizedPoint::new(0.5, 0.5)),
            Point::new(0.0, 0.0)
        );
        assert_eq!(
            container.to_normalized(Point::new(40.0, 12.0)),
            NormalizedPoint::new(0.0, 0.0)
        );
    }

    #[test]
    fn standard_edge_is_a_twenty_fourth_of_the_width() {
        let footprint = Container::new(1200.0, 700.0).footprint(TableVariant::Standard);

        assert!((footprint.width - 50.0).abs() < EPSILON);
        assert!((footprint.height - 50.0).abs() < EPSILON);
    }

    #[test]
    fn special_tables_are_wider() {
        let footprint = Container::new(1200.0, 700.0).footprint(TableVariant::Special);

        assert!((footprint.width - 140.0).abs() < EPSILON);
        assert!((footprint.height - 60.0).abs() < EPSILON);
    }

    #[test]
    fn clamp_keeps_footprint_inside() {
        let container = Container::new(1200.0, 700.0);

        for variant in [TableVariant::Standard, TableVariant::Special] {
            let footprint = container.footprint(variant);
            for point in [
                Point::new(-500.0, -20.0),
                Point::new(5000.0, 9000.0),
                Point::new(1190.0, 695.0),
                Point::new(600.0, 300.0),
            ] {
                let clamped = container.clamp(point, variant);
                assert!(clamped.x >= 0.0 && clamped.y >= 0.0);
                assert!(clamped.x + footprint.width <= container.width + EPSILON);
                assert!(clamped.y + footprint.height <= container.height + EPSILON);
            }
        }
    }

    #[test]
    fn clamp_pins_to_origin_when_table_does_not_fit() {
        let container = Container::new(1200.0, 20.0);

        let clamped = container.clamp(Point::new(100.0, 15.0), TableVariant::Standard);

        assert_eq!(clamped, Point::new(100.0, 0.0));
    }
}
