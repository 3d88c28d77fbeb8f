// Part name label - a world-space plate oriented once at spawn, its text rendered into the plate's texture
use bevy::prelude::*;
use bevy::asset::RenderAssetUsages;
use bevy::ecs::system::SystemParam;
use bevy::pbr::{NotShadowCaster, NotShadowReceiver};
use bevy::render::camera::RenderTarget;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat, TextureUsages};

use crate::config::LabelTemplate;
use super::single::LabelEntities;

/// World-space plate carrying the rendered name
#[derive(Component)]
pub struct PartLabelPlate;

/// Root of the UI tree drawn into a label's texture
#[derive(Component)]
pub struct PartLabelText {
    pub plate: Entity,
}

/// Assets a label allocates: plate mesh, text texture and plate material
#[derive(SystemParam)]
pub struct LabelAssets<'w> {
    pub meshes: ResMut<'w, Assets<Mesh>>,
    pub images: ResMut<'w, Assets<Image>>,
    pub materials: ResMut<'w, Assets<StandardMaterial>>,
}

/// Label position: above the part's world bounds center, after the part's lift
pub fn label_anchor(bounds_center: Vec3, lift_world: Vec3, height: f32) -> Vec3 {
    bounds_center + lift_world + Vec3::Y * height
}

/// Rotation making the plate's front (+Z) face `viewer`, fixed at spawn time
pub fn label_facing(position: Vec3, viewer: Vec3) -> Quat {
    let away = position - viewer;
    if away.length_squared() < 1e-8 {
        return Quat::IDENTITY;
    }
    Transform::from_translation(position)
        .looking_to(away, Vec3::Y)
        .rotation
}

/// Render target the label's text is drawn into
fn label_texture(size: UVec2) -> Image {
    let extent = Extent3d {
        width: size.x,
        height: size.y,
        ..default()
    };
    let mut image = Image::new_fill(
        extent,
        TextureDimension::D2,
        &[0, 0, 0, 0],
        TextureFormat::Bgra8UnormSrgb,
        RenderAssetUsages::default(),
    );
    image.texture_descriptor.usage =
        TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST | TextureUsages::RENDER_ATTACHMENT;
    image
}

/// Spawns the plate, an offscreen camera rendering `text` into the plate's
/// texture, and the UI tree that camera draws. Nothing here tracks the viewer
/// afterwards, so the text turns only with the plate.
pub fn spawn_label(
    commands: &mut Commands,
    assets: &mut LabelAssets,
    template: &LabelTemplate,
    text: &str,
    position: Vec3,
    rotation: Quat,
) -> LabelEntities {
    let texture = assets.images.add(label_texture(template.texture_size));

    let camera = commands
        .spawn((
            Camera2d,
            Camera {
                // Render before the main view samples the texture
                order: -1,
                target: RenderTarget::Image(texture.clone().into()),
                clear_color: ClearColorConfig::Custom(template.plate_color),
                ..default()
            },
            Name::new(format!("Label camera {}", text)),
        ))
        .id();

    let plate = commands
        .spawn((
            Mesh3d(assets.meshes.add(Rectangle::new(template.plate_size.x, template.plate_size.y))),
            MeshMaterial3d(assets.materials.add(StandardMaterial {
                base_color: Color::WHITE,
                base_color_texture: Some(texture),
                alpha_mode: AlphaMode::Blend,
                unlit: true,
                ..default()
            })),
            Transform::from_translation(position).with_rotation(rotation),
            NotShadowCaster,
            NotShadowReceiver,
            PartLabelPlate,
            Name::new(format!("Label {}", text)),
        ))
        .id();

    let text = commands
        .spawn((
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            UiTargetCamera(camera),
            PartLabelText { plate },
        ))
        .with_child((
            Text::new(text),
            TextFont {
                font_size: template.font_size,
                ..default()
            },
            TextColor(template.text_color),
        ))
        .id();

    LabelEntities { plate, camera, text }
}

pub fn despawn_label(commands: &mut Commands, label: LabelEntities) {
    commands.entity(label.text).despawn();
    commands.entity(label.camera).despawn();
    commands.entity(label.plate).despawn();
}
