use std::marker::PhantomData;

use masking::MaskSubject;
use serde_json::json;

struct NotSerializable;

#[derive(MaskSubject)]
struct Envelope<T, M> {
    #[mask_subject(id)]
    key: String,
    body: T,
    #[mask_subject(slot)]
    masker_body: Option<T>,
    _marker: PhantomData<M>,
}

fn main() {
    let mut envelope: Envelope<u32, NotSerializable> = Envelope {
        key: "k-1".to_string(),
        body: 42,
        masker_body: None,
        _marker: PhantomData,
    };

    assert_eq!(envelope.type_name(), "Envelope");
    assert_eq!(envelope.attribute("body").unwrap(), Some(json!(42)));
    assert_eq!(envelope.record_id(), Some(json!("k-1")));
    assert!(envelope.assign("masker_body", json!(7)).unwrap());
    assert_eq!(envelope.masker_body, Some(7));
}
