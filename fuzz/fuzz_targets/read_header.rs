#![no_main]
use libfuzzer_sys::fuzz_target;
use nifti_reshape::{ImageInfo, NiftiHeader};

fuzz_target!(|data: &[u8]| {
    if let Ok(header) = NiftiHeader::from_reader(data) {
        let _ = header.dim();
        let _ = header.data_type();
        let _ = header.qform();
        let _ = header.sform();
        let _ = nifti_reshape::affine::SpatialFrame::from_header(&header);
        if let Ok(info) = ImageInfo::from_header(&header) {
            let _ = info.vector_layout();
            let _ = info.scalar4_layout();
        }
    }
});
