use draco_decode::fixture::{AttributeEncoding, FixtureAttribute, SequentialBlob};
use draco_decode::{
    AttributeBuffer, DataType, Decoder, EncodedGeometryType, GeometryAttributeType, Mesh,
    UniqueId, probe_geometry_kind,
};

const NUM_POINTS: u32 = 99;
const NUM_FACES: u32 = 170;

/// 99 points, 170 faces, a float position and an integer-coded texcoord.
fn fixture_blob() -> Vec<u8> {
    let faces = (0..NUM_FACES).map(|i| [i % 97, i % 97 + 1, i % 97 + 2]).collect();
    let positions = (0..NUM_POINTS * 3)
        .flat_map(|i| (i as f32 * 0.5).to_le_bytes())
        .collect();
    let texcoords = (0..NUM_POINTS * 2)
        .flat_map(|i| (i as u16 * 300).to_le_bytes())
        .collect();

    SequentialBlob::mesh(NUM_POINTS, faces)
        .attribute(FixtureAttribute::new(
            GeometryAttributeType::Position,
            DataType::Float32,
            3,
            false,
            positions,
        ))
        .attribute(
            FixtureAttribute::new(
                GeometryAttributeType::TexCoord,
                DataType::Uint16,
                2,
                true,
                texcoords,
            )
            .with_encoding(AttributeEncoding::Integer),
        )
        .build()
}

fn decode_fixture() -> Mesh {
    Decoder::new().decode_mesh(&fixture_blob()).unwrap()
}

#[test]
fn fixture_counts_and_first_face() {
    let mesh = decode_fixture();
    assert_eq!(mesh.num_points(), NUM_POINTS);
    assert_eq!(mesh.num_faces(), NUM_FACES as usize);
    assert_eq!(mesh.num_attrs(), 2);
    assert_eq!(mesh.faces(Vec::new())[0], [0, 1, 2]);
    assert_eq!(mesh.named_attribute_id(GeometryAttributeType::Position), Some(0));
    assert_eq!(mesh.named_attribute_id(GeometryAttributeType::TexCoord), Some(1));
}

#[test]
fn stores_are_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Mesh>();
    assert_send_sync::<draco_decode::PointCloud>();

    let mesh = std::sync::Arc::new(decode_fixture());
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let mesh = std::sync::Arc::clone(&mesh);
            std::thread::spawn(move || {
                let mut positions = Vec::<f32>::new();
                mesh.attribute_data_into(mesh.attr(0).unwrap(), &mut positions);
                positions.len()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), 297);
    }
}

#[test]
fn unique_ids_follow_declaration_order() {
    let mesh = decode_fixture();
    let ids: Vec<_> = mesh.attrs().map(|a| a.unique_id()).collect();
    assert_eq!(ids, vec![UniqueId(0), UniqueId(1)]);
    for (i, attr) in mesh.attrs().enumerate() {
        assert_eq!(mesh.attr_by_unique_id(attr.unique_id()), mesh.attr(i));
    }
}

#[test]
fn probe_then_matching_decode() {
    let blob = fixture_blob();
    assert_eq!(probe_geometry_kind(&blob), EncodedGeometryType::TriangularMesh);
    assert!(Decoder::new().decode_mesh(&blob).is_ok());
    assert!(Decoder::new().decode_point_cloud(&blob).is_err());
}

#[test]
fn attributes_extract_in_native_and_converted_types() {
    let mesh = decode_fixture();

    let position = mesh.attr(0).unwrap();
    let (buffer, ok) = mesh.attribute_data(position, None).unwrap();
    assert!(ok);
    let values = buffer.as_slice::<f32>().unwrap();
    assert_eq!(values.len(), 297);
    assert_eq!(values[5], 2.5);

    let texcoord = mesh.attr(1).unwrap();
    let (buffer, ok) = mesh
        .attribute_data(texcoord, Some(AttributeBuffer::Float32(Vec::new())))
        .unwrap();
    assert!(ok);
    let values = buffer.as_slice::<f32>().unwrap();
    assert_eq!(values.len(), 198);
    assert_eq!(values[0], 0.0);
    assert!((values[1] - 300.0 / 65535.0).abs() < 1e-6);
}

#[test]
fn repeated_extraction_is_stable() {
    let mesh = decode_fixture();
    let attr = mesh.attr(1).unwrap();
    let (first, _) = mesh.attribute_data(attr, None).unwrap();
    let (second, _) = mesh.attribute_data(attr, None).unwrap();
    assert_eq!(first.to_le_bytes(), second.to_le_bytes());

    let mut reused = Vec::<u32>::new();
    assert!(mesh.attribute_data_into(attr, &mut reused));
    let capacity = reused.capacity();
    assert!(mesh.attribute_data_into(attr, &mut reused));
    assert_eq!(reused.capacity(), capacity);
    assert_eq!(reused[3], 900);
}

#[test]
fn faces_buffer_is_reused() {
    let mesh = decode_fixture();
    let faces = mesh.faces(Vec::new());
    let ptr = faces.as_ptr();
    let faces = mesh.faces(faces);
    assert_eq!(faces.as_ptr(), ptr);
    assert_eq!(faces.len(), NUM_FACES as usize);
    assert_eq!(faces[169], [72, 73, 74]);
}
