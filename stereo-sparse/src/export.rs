use cv_stereo::ReconstructedPoint;
use ply_rs::{
    ply::{
        Addable, DefaultElement, ElementDef, Encoding, Ply, Property, PropertyDef, PropertyType,
        ScalarType,
    },
    writer::Writer,
};
use std::io::Write;

/// Writes the reconstructed points as the colored vertices of an ASCII PLY file.
pub fn export(mut writer: impl Write, points: &[ReconstructedPoint]) -> std::io::Result<()> {
    let mut ply = Ply::<DefaultElement>::new();
    ply.header.encoding = Encoding::Ascii;
    ply.header
        .comments
        .push("Exported from rust-cv/stereo-sparse".to_string());

    let mut point_element = ElementDef::new("vertex".to_string());
    for axis in ["x", "y", "z"] {
        let p = PropertyDef::new(axis.to_string(), PropertyType::Scalar(ScalarType::Double));
        point_element.properties.add(p);
    }
    for channel in ["red", "green", "blue"] {
        let p = PropertyDef::new(channel.to_string(), PropertyType::Scalar(ScalarType::UChar));
        point_element.properties.add(p);
    }
    ply.header.elements.add(point_element);

    let vertices = points
        .iter()
        .map(|&ReconstructedPoint { point, color }| {
            let [r, g, b] = color;
            let mut vertex = DefaultElement::new();
            vertex.insert("x".to_string(), Property::Double(point.x));
            vertex.insert("y".to_string(), Property::Double(point.y));
            vertex.insert("z".to_string(), Property::Double(point.z));
            vertex.insert("red".to_string(), Property::UChar(r));
            vertex.insert("green".to_string(), Property::UChar(g));
            vertex.insert("blue".to_string(), Property::UChar(b));
            vertex
        })
        .collect();
    ply.payload.insert("vertex".to_string(), vertices);

    Writer::new().write_ply(&mut writer, &mut ply)?;
    Ok(())
}
