use super::Vector2d;

/// Rotates a vector 90 degrees clockwise, giving the normal
/// which points to the right of the direction of travel.
pub fn right_normal(vec: Vector2d) -> Vector2d {
    Vector2d::new(vec.y, -vec.x)
}
