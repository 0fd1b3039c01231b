use bevy::prelude::*;

use crate::geo::Viewport;

/// Static 2D camera. Panning and zooming move the map under it, not the
/// camera itself.
#[derive(Component)]
pub struct EditorCamera;

pub fn spawn_camera(mut commands: Commands) {
    commands.spawn((
        Camera2d,
        EditorCamera,
        Transform::from_translation(Vec3::new(0.0, 0.0, 1000.0)),
    ));
}

/// World position of a window pixel for a camera centered on the window.
pub fn pixel_to_world(pixel: IVec2, viewport: &Viewport) -> Vec2 {
    Vec2::new(
        pixel.x as f32 - viewport.width as f32 / 2.0,
        viewport.height as f32 / 2.0 - pixel.y as f32,
    )
}
