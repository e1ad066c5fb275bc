use std::collections::BTreeSet;
use std::fmt::Display;

use chrono::NaiveDate;

use super::wire::format_timestamp;
use crate::domain::{
    BatchDeliveryReportParams, BatchFilter, DeliveryReportFilter, DeliveryStatus, GroupFilter,
    InboundsFilter, Msisdn, Sender,
};

pub fn encode_batch_filter_query(filter: &BatchFilter, page: u32) -> Vec<(String, String)> {
    let mut params = paging(page, filter.page_size);
    push_joined(&mut params, Sender::FIELD, filter.senders.iter().map(Sender::as_str));
    push_joined(&mut params, "tags", filter.tags.iter());
    push_dates(&mut params, filter.start_date, filter.end_date);
    if let Some(reference) = filter.client_reference.as_ref() {
        params.push(("client_reference".to_owned(), reference.clone()));
    }
    params
}

pub fn encode_group_filter_query(filter: &GroupFilter, page: u32) -> Vec<(String, String)> {
    let mut params = paging(page, filter.page_size);
    push_joined(&mut params, "tags", filter.tags.iter());
    params
}

pub fn encode_inbounds_filter_query(filter: &InboundsFilter, page: u32) -> Vec<(String, String)> {
    let mut params = paging(page, filter.page_size);
    push_joined(
        &mut params,
        Msisdn::FIELD,
        filter.recipients.iter().map(Msisdn::as_str),
    );
    push_dates(&mut params, filter.start_date, filter.end_date);
    params
}

pub fn encode_delivery_report_filter_query(
    filter: &DeliveryReportFilter,
    page: u32,
) -> Vec<(String, String)> {
    let mut params = paging(page, filter.page_size);
    if let Some(start) = filter.start_date.as_ref() {
        params.push(("start_date".to_owned(), format_timestamp(start)));
    }
    if let Some(end) = filter.end_date.as_ref() {
        params.push(("end_date".to_owned(), format_timestamp(end)));
    }
    push_statuses(&mut params, &filter.statuses, &filter.codes);
    if let Some(reference) = filter.client_reference.as_ref() {
        params.push(("client_reference".to_owned(), reference.clone()));
    }
    params
}

/// Query of a single batch's delivery report; not paged.
pub fn encode_batch_delivery_report_query(
    params: &BatchDeliveryReportParams,
) -> Vec<(String, String)> {
    let mut query = Vec::new();
    if let Some(detail) = params.detail {
        query.push(("type".to_owned(), detail.as_str().to_owned()));
    }
    push_statuses(&mut query, &params.statuses, &params.codes);
    query
}

fn paging(page: u32, page_size: Option<u32>) -> Vec<(String, String)> {
    let mut params = vec![("page".to_owned(), page.to_string())];
    if let Some(size) = page_size {
        params.push(("page_size".to_owned(), size.to_string()));
    }
    params
}

fn push_dates(
    params: &mut Vec<(String, String)>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) {
    if let Some(start) = start {
        params.push(("start_date".to_owned(), start.to_string()));
    }
    if let Some(end) = end {
        params.push(("end_date".to_owned(), end.to_string()));
    }
}

fn push_statuses(
    params: &mut Vec<(String, String)>,
    statuses: &BTreeSet<DeliveryStatus>,
    codes: &BTreeSet<i32>,
) {
    push_joined(params, "status", statuses.iter().map(DeliveryStatus::as_str));
    push_joined(params, "code", codes.iter());
}

/// Empty lists are left out rather than sent as an empty value.
fn push_joined<I>(params: &mut Vec<(String, String)>, key: &str, values: I)
where
    I: IntoIterator,
    I::Item: Display,
{
    let joined = values
        .into_iter()
        .map(|value| value.to_string())
        .collect::<Vec<_>>()
        .join(",");
    if !joined.is_empty() {
        params.push((key.to_owned(), joined));
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::domain::{BatchReportDetail, KnownDeliveryStatus};

    fn pairs(params: &[(String, String)]) -> Vec<(&str, &str)> {
        params
            .iter()
            .map(|(key, value)| (key.as_str(), value.as_str()))
            .collect()
    }

    #[test]
    fn batch_filter_joins_lists_and_formats_dates() {
        let filter = BatchFilter {
            page_size: Some(50),
            senders: BTreeSet::from([Sender::new("B").unwrap(), Sender::new("A").unwrap()]),
            tags: BTreeSet::from(["promo".to_owned()]),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 31),
            end_date: None,
            client_reference: Some("ref".to_owned()),
        };
        assert_eq!(
            pairs(&encode_batch_filter_query(&filter, 3)),
            vec![
                ("page", "3"),
                ("page_size", "50"),
                ("from", "A,B"),
                ("tags", "promo"),
                ("start_date", "2024-01-31"),
                ("client_reference", "ref"),
            ]
        );
    }

    #[test]
    fn default_filters_only_carry_the_page() {
        assert_eq!(
            pairs(&encode_group_filter_query(&GroupFilter::default(), 0)),
            vec![("page", "0")]
        );
        assert_eq!(
            pairs(&encode_inbounds_filter_query(&InboundsFilter::default(), 1)),
            vec![("page", "1")]
        );
        assert!(encode_batch_delivery_report_query(&BatchDeliveryReportParams::default()).is_empty());
    }

    #[test]
    fn inbounds_filter_lists_recipients() {
        let filter = InboundsFilter {
            recipients: Msisdn::list(["54321", "12345"]).unwrap().into_iter().collect(),
            end_date: NaiveDate::from_ymd_opt(2024, 2, 1),
            ..Default::default()
        };
        assert_eq!(
            pairs(&encode_inbounds_filter_query(&filter, 0)),
            vec![("page", "0"), ("to", "12345,54321"), ("end_date", "2024-02-01")]
        );
    }

    #[test]
    fn delivery_report_filter_uses_timestamps_and_codes() {
        let filter = DeliveryReportFilter {
            start_date: Some(DateTime::parse_from_rfc3339("2024-03-01T00:00:00+01:00").unwrap()),
            statuses: BTreeSet::from([
                KnownDeliveryStatus::Delivered.into(),
                KnownDeliveryStatus::Failed.into(),
            ]),
            codes: BTreeSet::from([402, 0]),
            ..Default::default()
        };
        assert_eq!(
            pairs(&encode_delivery_report_filter_query(&filter, 0)),
            vec![
                ("page", "0"),
                ("start_date", "2024-03-01T00:00:00+01:00"),
                ("status", "Delivered,Failed"),
                ("code", "0,402"),
            ]
        );
    }

    #[test]
    fn batch_report_query_has_no_page() {
        let params = BatchDeliveryReportParams {
            detail: Some(BatchReportDetail::Full),
            codes: BTreeSet::from([400]),
            ..Default::default()
        };
        assert_eq!(
            pairs(&encode_batch_delivery_report_query(&params)),
            vec![("type", "full"), ("code", "400")]
        );
    }
}
