use std::io::{Read, Seek};

use crate::assets::{Asset, AssetStore, sniff_media_type};
use crate::model::{Image, ImagePosition, ImageSize};

use super::package::Package;
use super::{DML_NS, REL_NS, WPD_NS};

fn wpd<'a>(node: roxmltree::Node<'a, 'a>, name: &str) -> Option<roxmltree::Node<'a, 'a>> {
    node.children()
        .find(|n| n.tag_name().name() == name && n.tag_name().namespace() == Some(WPD_NS))
}

fn find_blip_embed<'a>(container: roxmltree::Node<'a, 'a>) -> Option<&'a str> {
    container
        .descendants()
        .find(|n| n.tag_name().name() == "blip" && n.tag_name().namespace() == Some(DML_NS))
        .and_then(|n| n.attribute((REL_NS, "embed")))
        .filter(|id| !id.is_empty())
}

fn parse_extent(container: roxmltree::Node) -> Option<ImageSize> {
    let extent = wpd(container, "extent")?;
    let width = extent.attribute("cx")?.trim().parse::<u64>().ok()?;
    let height = extent.attribute("cy")?.trim().parse::<u64>().ok()?;
    Some(ImageSize { width, height })
}

fn parse_anchor_position(container: roxmltree::Node) -> Option<ImagePosition> {
    let align = |axis: &str| -> Option<String> {
        wpd(container, axis)
            .and_then(|pos| wpd(pos, "align"))
            .and_then(|n| n.text())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(String::from)
    };
    let position = ImagePosition {
        horizontal: align("positionH"),
        vertical: align("positionV"),
    };
    if position.horizontal.is_none() && position.vertical.is_none() {
        None
    } else {
        Some(position)
    }
}

/// Turns `w:drawing` elements into uploaded [`Image`] nodes.
pub struct ImageResolver<'s> {
    store: &'s dyn AssetStore,
    uploaded: usize,
    dropped: usize,
}

impl<'s> ImageResolver<'s> {
    pub fn new(store: &'s dyn AssetStore) -> Self {
        Self {
            store,
            uploaded: 0,
            dropped: 0,
        }
    }

    pub fn uploaded(&self) -> usize {
        self.uploaded
    }

    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// Resolve a `w:drawing` element. Returns `None` when the drawing has no
    /// embedded picture or when its bytes cannot be read or uploaded.
    pub fn resolve<R: Read + Seek>(
        &mut self,
        drawing: roxmltree::Node,
        package: &mut Package<R>,
    ) -> Option<Image> {
        let container = drawing.children().find(|n| {
            let name = n.tag_name().name();
            (name == "inline" || name == "anchor") && n.tag_name().namespace() == Some(WPD_NS)
        })?;

        let size = parse_extent(container);
        let position = if container.tag_name().name() == "anchor" {
            parse_anchor_position(container)
        } else {
            None
        };

        let Some(embed_id) = find_blip_embed(container) else {
            log::debug!("Drawing without an embedded picture, skipping");
            return None;
        };

        let Some(part) = package.relationship_part(embed_id) else {
            log::warn!("Image relationship {embed_id} has no internal target, dropping image");
            self.dropped += 1;
            return None;
        };
        let Some(data) = package.read_bytes(&part) else {
            log::warn!("Image part {part} is missing from the package, dropping image");
            self.dropped += 1;
            return None;
        };

        let name = part.rsplit('/').next().unwrap_or(part.as_str());
        let asset = Asset {
            name,
            media_type: sniff_media_type(&data, name),
            data: &data,
        };
        match self.store.upload(&asset) {
            Ok(url) => {
                log::debug!("Uploaded {part} ({} bytes) to {url}", data.len());
                self.uploaded += 1;
                Some(Image {
                    asset_url: url,
                    position,
                    size,
                })
            }
            Err(e) => {
                log::warn!("Failed to upload image {part}: {e}");
                self.dropped += 1;
                None
            }
        }
    }
}
