use grib2_codec::grib::bits::BitCursor;
use grib2_codec::grib::sections::sect3::GridDefinition;
use grib2_codec::grib::sections::sect5::{DataRepresentationDefinition, RepresentationParams};
use grib2_codec::grib::sections::sect7::{simple, write_data_section, DataSectionDecoder, DataSectionEncoder};
use grib2_codec::grib::templates::{extend, TemplateCategory};
use grib2_codec::grib::GribError;

fn init() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[test]
fn simple_packing_of_four_values() {
    init();
    let mut params = RepresentationParams::for_template(0).unwrap();
    let payload = simple::pack(&[1.0, 2.0, 3.0, 4.0], &mut params).unwrap();

    assert_eq!(params.num_bits().unwrap(), 2);
    assert_eq!(params.reference_value().unwrap(), 1.0);
    assert_eq!(payload, [0b00_01_10_11]);
    assert_eq!(simple::unpack(&params, 4, &payload).unwrap(), [1.0, 2.0, 3.0, 4.0]);
}

#[test]
fn constant_field_packs_to_nothing() {
    init();
    let mut drs = DataRepresentationDefinition::new(0, RepresentationParams::for_template(0).unwrap());
    let section = DataSectionEncoder::default().pack(&[5.0, 5.0, 5.0], 3, 1, &mut drs).unwrap();

    assert_eq!(drs.params.num_bits().unwrap(), 0);
    assert_eq!(section, [0, 0, 0, 5, 7]);

    let mut cursor = BitCursor::new();
    let decoded = DataSectionDecoder::default()
        .unpack(&section, &mut cursor, &GridDefinition::default(), &drs)
        .unwrap();
    assert_eq!(&decoded[..], [5.0, 5.0, 5.0]);
    assert_eq!(cursor.byte_position(), 5);
}

#[test]
fn satellite_template_extends_by_band() {
    init();
    let instance = extend(TemplateCategory::ProductDefinition, 30, &[0, 0, 0, 0, 3]).unwrap();
    assert_eq!(instance.extension().len(), 15);
    for record in instance.extension().chunks(5) {
        assert_eq!(record, [2, 2, 1, 1, 4]);
    }
}

#[test]
fn spectral_complex_needs_a_spherical_harmonics_grid() {
    init();
    let section = write_data_section(&[0; 16]).unwrap();
    let drs = DataRepresentationDefinition::new(8, RepresentationParams::for_template(51).unwrap());
    let grid = GridDefinition::new(60, vec![0; 20]);

    let mut cursor = BitCursor::new();
    assert!(matches!(
        DataSectionDecoder::default().unpack(&section, &mut cursor, &grid, &drs),
        Err(GribError::IncompatibleGridTemplate { drt: 51, gdt: 60 })
    ));
    assert_eq!(cursor.position(), 0);

    // a compatible grid gets as far as the missing engine
    let grid = GridDefinition::new(50, vec![10, 10, 10]);
    assert!(matches!(
        DataSectionDecoder::default().unpack(&section, &mut cursor, &grid, &drs),
        Err(GribError::UnsupportedTemplate(51))
    ));
}

#[test]
fn constant_reference_is_the_unscaled_value() {
    init();
    // the general case stores min * 10^D, a constant field stores the value itself
    let mut params = RepresentationParams::for_template(0).unwrap();
    params.set(2, 1).unwrap();

    simple::pack(&[1.5, 2.5], &mut params).unwrap();
    assert_eq!(params.reference_value().unwrap(), 15.0);

    simple::pack(&[1.5, 1.5], &mut params).unwrap();
    assert_eq!(params.reference_value().unwrap(), 1.5);
    assert_eq!(simple::unpack(&params, 2, &[]).unwrap(), [1.5, 1.5]);
}
