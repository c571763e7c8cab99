//! Request and response types exchanged with the Spay gateway.
//!
//! Field names follow the gateway's JSON contract, which mixes PascalCase,
//! camelCase and upper-case keys across endpoints. Rust field names are
//! snake_case and mapped with `#[serde(rename)]`.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Treat an explicit JSON `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ---------------------------------------------------------------------------
// Shared request header
// ---------------------------------------------------------------------------

/// Fields every encrypted gateway request starts with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseRequest {
    #[serde(rename = "Referenceid")]
    pub reference_id: String,
    #[serde(rename = "RequestType")]
    pub request_type: i32,
    #[serde(rename = "Translocation")]
    pub translocation: String,
}

// ---------------------------------------------------------------------------
// Response envelopes
// ---------------------------------------------------------------------------

/// Generic success envelope: `{message, response, Responsedata, data}`.
///
/// `T` is the endpoint-specific shape of the `data` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de> + Default"))]
pub struct OperationEnvelope<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub response: String,
    #[serde(rename = "Responsedata", default)]
    pub response_data: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: T,
}

/// `data` object for list-style calls whose payload is itself a JSON string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OperationData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub response: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

/// Error envelope returned with non-2xx statuses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub response: String,
    #[serde(rename = "Responsedata", default)]
    pub response_data: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: ErrorData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ErrorData {
    #[serde(rename = "ResponseText", default, deserialize_with = "null_as_default")]
    pub response_text: String,
    #[serde(default)]
    pub status: Option<Value>,
}

// ---------------------------------------------------------------------------
// Interbank transfer
// ---------------------------------------------------------------------------

/// Caller-supplied parameters for a transfer to another bank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterBankTransfer {
    pub reference: String,
    /// Falls back to the configured location when empty.
    pub translocation: String,
    pub payment_reference: String,
    pub to_account: String,
    pub amount: String,
    pub destination_bank_code: String,
    /// Raw name-enquiry response echoed back to the gateway.
    pub ne_response: String,
    pub beneficiary_name: String,
    pub teller_id: String,
    pub remarks: String,
    /// Session id returned by the preceding interbank name enquiry.
    pub name_enquiry_session_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterBankTransferPayload {
    #[serde(flatten)]
    pub base: BaseRequest,
    #[serde(rename = "SessionID")]
    pub session_id: String,
    #[serde(rename = "FromAccount")]
    pub from_account: String,
    #[serde(rename = "ToAccount")]
    pub to_account: String,
    #[serde(rename = "Amount")]
    pub amount: String,
    #[serde(rename = "DestinationBankCode")]
    pub destination_bank_code: String,
    #[serde(rename = "NEResponse")]
    pub ne_response: String,
    #[serde(rename = "BenefiName")]
    pub beneficiary_name: String,
    #[serde(rename = "PaymentReference")]
    pub payment_reference: String,
    #[serde(rename = "tellerid")]
    pub teller_id: String,
    #[serde(rename = "remarks")]
    pub remarks: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterBankTransferData {
    #[serde(rename = "ResponseText", default)]
    pub response_text: Option<Value>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

pub type InterBankTransferResult = OperationEnvelope<InterBankTransferData>;

// ---------------------------------------------------------------------------
// Intrabank transfer
// ---------------------------------------------------------------------------

/// Caller-supplied parameters for a transfer between two accounts of the bank.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntraBankTransfer {
    /// A random reference is generated when empty.
    pub reference_id: String,
    pub translocation: String,
    pub payment_ref: String,
    pub amount: f64,
    pub to_account: String,
    pub remarks: String,
    /// Falls back to the configured teller id when empty.
    pub teller_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntraBankTransferPayload {
    #[serde(flatten)]
    pub base: BaseRequest,
    pub amt: String,
    #[serde(rename = "tellerid")]
    pub teller_id: String,
    #[serde(rename = "frmacct")]
    pub from_account: String,
    #[serde(rename = "toacct")]
    pub to_account: String,
    #[serde(rename = "paymentRef")]
    pub payment_ref: String,
    pub remarks: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntraBankTransferData {
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
}

pub type IntraBankTransferResult = OperationEnvelope<IntraBankTransferData>;

// ---------------------------------------------------------------------------
// Name enquiry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntraBankNameEnquiryPayload {
    #[serde(flatten)]
    pub base: BaseRequest,
    #[serde(rename = "NUBAN")]
    pub nuban: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntraBankNameEnquiry {
    #[serde(rename = "AccountName", default, deserialize_with = "null_as_default")]
    pub account_name: String,
    #[serde(rename = "AccountNumber", default, deserialize_with = "null_as_default")]
    pub account_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(rename = "BVN", default, deserialize_with = "null_as_default")]
    pub bvn: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterBankNameEnquiryPayload {
    #[serde(flatten)]
    pub base: BaseRequest,
    #[serde(rename = "ToAccount")]
    pub to_account: String,
    #[serde(rename = "DestinationBankCode")]
    pub destination_bank_code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InterBankNameEnquiry {
    #[serde(rename = "AccountName", default, deserialize_with = "null_as_default")]
    pub account_name: String,
    #[serde(rename = "sessionID", default, deserialize_with = "null_as_default")]
    pub session_id: String,
    #[serde(rename = "AccountNumber", default, deserialize_with = "null_as_default")]
    pub account_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(rename = "BVN", default, deserialize_with = "null_as_default")]
    pub bvn: String,
    #[serde(rename = "ResponseText", default)]
    pub response_text: Option<Value>,
}

// ---------------------------------------------------------------------------
// Bank list
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    #[serde(rename = "BANKNAME", default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(rename = "BANKCODE", default, deserialize_with = "null_as_default")]
    pub code: String,
}

// ---------------------------------------------------------------------------
// Inflow requery (plaintext endpoints)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InflowQuery {
    #[serde(rename = "accountNumber")]
    pub account_number: String,
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccountInflowQuery {
    #[serde(rename = "AccountNumber")]
    pub account_number: String,
    #[serde(rename = "SessionID")]
    pub session_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionInflowQuery {
    #[serde(rename = "SessionID")]
    pub session_id: String,
    #[serde(rename = "StartDate")]
    pub start_date: String,
    #[serde(rename = "pageNumber")]
    pub page_number: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct InflowNotification {
    #[serde(deserialize_with = "null_as_default")]
    pub account_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub response_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub amount: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source_customer_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source_customer_account_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dateposted: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sender_bank: String,
    #[serde(deserialize_with = "null_as_default")]
    pub payment_ref: String,
    #[serde(deserialize_with = "null_as_default")]
    pub requery: String,
    #[serde(rename = "FTReference", deserialize_with = "null_as_default")]
    pub ft_reference: String,
    #[serde(rename = "SessionID", deserialize_with = "null_as_default")]
    pub session_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub remark: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct InflowList {
    #[serde(deserialize_with = "null_as_default")]
    pub success: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub data: Vec<InflowNotification>,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountInflow {
    #[serde(deserialize_with = "null_as_default")]
    pub account_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub response_code: String,
    #[serde(deserialize_with = "null_as_default")]
    pub amount: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source_customer_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub source_customer_account_number: String,
    #[serde(deserialize_with = "null_as_default")]
    pub dateposted: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sender_bank: String,
    #[serde(deserialize_with = "null_as_default")]
    pub payment_ref: String,
    pub requery: Option<String>,
    pub ft_reference: Option<String>,
    #[serde(rename = "sessionID", deserialize_with = "null_as_default")]
    pub session_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub remark: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AccountInflows {
    #[serde(deserialize_with = "null_as_default")]
    pub content: Vec<AccountInflow>,
    pub error: Option<Value>,
    #[serde(deserialize_with = "null_as_default")]
    pub has_error: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub error_message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub request_id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub is_success: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub request_time: String,
    #[serde(deserialize_with = "null_as_default")]
    pub response_time: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn base() -> BaseRequest {
        BaseRequest {
            reference_id: "1700000000000".into(),
            request_type: 219,
            translocation: "6.44,3.53".into(),
        }
    }

    #[test]
    fn base_fields_are_flattened_into_payload() {
        let payload = IntraBankNameEnquiryPayload {
            base: base(),
            nuban: "0011223344".into(),
        };
        let v = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            v,
            json!({
                "Referenceid": "1700000000000",
                "RequestType": 219,
                "Translocation": "6.44,3.53",
                "NUBAN": "0011223344",
            })
        );
    }

    #[test]
    fn error_envelope_tolerates_missing_fields() {
        let e: ErrorEnvelope =
            serde_json::from_str(r#"{"response":"x51","data":{"ResponseText":"Insufficient Funds"}}"#)
                .unwrap();
        assert_eq!(e.response, "x51");
        assert_eq!(e.data.response_text, "Insufficient Funds");
        assert!(e.message.is_empty());
        assert!(e.data.status.is_none());
    }

    #[test]
    fn error_envelope_accepts_null_strings() {
        let e: ErrorEnvelope =
            serde_json::from_str(r#"{"message":null,"response":"03x","data":{"ResponseText":null,"status":1}}"#)
                .unwrap();
        assert_eq!(e.response, "03x");
        assert!(e.data.response_text.is_empty());
        assert_eq!(e.data.status, Some(json!(1)));
    }

    #[test]
    fn error_envelope_accepts_null_data() {
        let e: ErrorEnvelope =
            serde_json::from_str(r#"{"message":"Failed","response":"x51","data":null}"#).unwrap();
        assert_eq!(e.response, "x51");
        assert_eq!(e.message, "Failed");
        assert_eq!(e.data, ErrorData::default());
    }

    #[test]
    fn name_enquiry_accepts_null_fields() {
        let r: OperationEnvelope<IntraBankNameEnquiry> = serde_json::from_value(json!({
            "response": "00",
            "data": {"AccountName": "ADA OBI", "AccountNumber": null, "status": "00", "BVN": null}
        }))
        .unwrap();
        assert_eq!(r.data.account_name, "ADA OBI");
        assert!(r.data.account_number.is_empty());
        assert!(r.data.bvn.is_empty());
    }

    #[test]
    fn operation_envelope_defaults_null_data() {
        let r: OperationEnvelope<OperationData> =
            serde_json::from_value(json!({"message": "Failed", "response": "99", "data": null}))
                .unwrap();
        assert_eq!(r.data, OperationData::default());
    }

    #[test]
    fn inflow_records_accept_null_values() {
        let r: AccountInflows = serde_json::from_value(json!({
            "content": [{"accountNumber": null, "amount": "20.00", "sessionID": null}],
            "hasError": null,
            "isSuccess": null,
            "message": null
        }))
        .unwrap();
        assert!(!r.is_success);
        assert!(r.content[0].account_number.is_empty());
        assert!(r.content[0].session_id.is_empty());

        let list: InflowList =
            serde_json::from_value(json!({"Success": true, "Data": null, "Message": null})).unwrap();
        assert!(list.success);
        assert!(list.data.is_empty());
    }

    #[test]
    fn operation_envelope_decodes_nested_data() {
        let r: OperationEnvelope<OperationData> = serde_json::from_value(json!({
            "message": "OK",
            "response": "00",
            "Responsedata": null,
            "data": {"response": "[]", "status": "Successful"}
        }))
        .unwrap();
        assert_eq!(r.data.status, "Successful");
        assert_eq!(r.data.response, "[]");
        assert!(r.response_data.is_none());
    }

    #[test]
    fn account_inflows_use_camel_case() {
        let r: AccountInflows = serde_json::from_value(json!({
            "content": [{
                "accountNumber": "0011223344",
                "amount": "500.00",
                "requery": null,
                "ftReference": "FT123",
                "sessionID": "S1"
            }],
            "hasError": false,
            "isSuccess": true,
            "requestTime": "2024-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(r.is_success);
        assert_eq!(r.content[0].ft_reference.as_deref(), Some("FT123"));
        assert_eq!(r.content[0].requery, None);
        assert_eq!(r.content[0].session_id, "S1");
    }

    #[test]
    fn bank_uses_upper_case_keys() {
        let banks: Vec<Bank> =
            serde_json::from_str(r#"[{"BANKNAME":"ACCESS BANK","BANKCODE":"044"}]"#).unwrap();
        assert_eq!(banks[0].code, "044");
        assert_eq!(banks[0].name, "ACCESS BANK");
    }
}
