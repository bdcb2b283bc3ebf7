//! Property-based tests for URL construction.

use hawkular_client::url::{encode_metric_id, raw_url, tags_suffix_url, UrlBuilder};
use hawkular_client::MetricType;
use proptest::prelude::*;

fn metric_type() -> impl Strategy<Value = Option<MetricType>> {
    prop_oneof![
        Just(None),
        Just(Some(MetricType::Gauge)),
        Just(Some(MetricType::Availability)),
        Just(Some(MetricType::Counter)),
        Just(Some(MetricType::String)),
    ]
}

fn builder() -> impl Strategy<Value = UrlBuilder> {
    (
        prop_oneof![Just("http"), Just("https")],
        "[a-z][a-z0-9.-]{0,20}",
        1u16..,
        prop_oneof![Just(String::new()), "/?[a-z]{1,8}(/[a-z]{1,8}){0,2}/?"],
    )
        .prop_map(|(scheme, host, port, path)| UrlBuilder::new(scheme, &host, port, &path))
}

proptest! {
    #[test]
    fn suffix_builders_match_direct_urls(
        urls in builder(),
        metric_type in metric_type(),
        id in "\\PC{1,40}",
    ) {
        let single = urls.metric_url(metric_type, &id);
        prop_assert_eq!(tags_suffix_url(&single), urls.tags_url(metric_type, &id));
        prop_assert_eq!(format!("{single}/tags"), urls.tags_url(metric_type, &id));
        prop_assert_eq!(raw_url(&urls.type_url(metric_type)), urls.datapoints_url(metric_type));
        prop_assert_eq!(format!("{single}/raw"), raw_url(&single));
    }

    #[test]
    fn encoded_id_is_a_single_safe_segment(id in "\\PC{1,40}") {
        let encoded = encode_metric_id(&id);
        prop_assert!(encoded
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"-_.~%".contains(&b)));
    }

    #[test]
    fn urls_are_deterministic(
        urls in builder(),
        metric_type in metric_type(),
        id in "[a-zA-Z0-9 /?]{1,20}",
    ) {
        prop_assert_eq!(urls.metric_url(metric_type, &id), urls.clone().metric_url(metric_type, &id));
        prop_assert!(urls.metric_url(metric_type, &id).starts_with(urls.base_url()));
        prop_assert!(urls.base_url().ends_with('/'));
        prop_assert!(!urls.base_url()["https://".len()..].contains("//"));
    }
}
