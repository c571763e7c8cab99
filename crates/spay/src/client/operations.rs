//! Typed gateway operations built on [`SpayClient::execute`].

use chrono::{Local, NaiveDate, Utc};
use common::protocol::{
    AccountInflowQuery, AccountInflows, Bank, BaseRequest, InflowList, InflowQuery,
    InterBankNameEnquiry, InterBankNameEnquiryPayload, InterBankTransfer,
    InterBankTransferPayload, InterBankTransferResult, IntraBankNameEnquiry,
    IntraBankNameEnquiryPayload, IntraBankTransfer, IntraBankTransferPayload,
    IntraBankTransferResult, OperationData, OperationEnvelope, SessionInflowQuery,
};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;

use super::endpoint::{Endpoint, SuccessGate};
use super::transport::Transport;
use super::SpayClient;
use crate::error::SpayError;

/// CBN code of the bank operating the gateway.
pub const BANK_CODE: &str = "232";

const TRANSFER_SUCCESS: SuccessGate = SuccessGate::response_code("00");
const ENQUIRY_SUCCESS: SuccessGate = SuccessGate::data_status("00", "/response");
const LIST_SUCCESS: SuccessGate = SuccessGate::data_status("Successful", "/data/response");

pub const INTERBANK_TRANSFER: Endpoint = Endpoint::gateway(
    "interbank transfer",
    "/api/Spay/InterbankTransferReq",
    TRANSFER_SUCCESS,
);
pub const INTRABANK_TRANSFER: Endpoint = Endpoint::gateway(
    "intrabank transfer",
    "/api/Spay/SBPT24txnRequest",
    TRANSFER_SUCCESS,
);
pub const INTRABANK_NAME_ENQUIRY: Endpoint = Endpoint::gateway(
    "intrabank name enquiry",
    "/api/Spay/SBPNameEnquiry",
    ENQUIRY_SUCCESS,
);
pub const INTERBANK_NAME_ENQUIRY: Endpoint = Endpoint::gateway(
    "interbank name enquiry",
    "/api/Spay/InterbankNameEnquiry",
    ENQUIRY_SUCCESS,
);
pub const LIST_BANKS: Endpoint =
    Endpoint::gateway("bank list", "/api/Spay/GetBankListReq", LIST_SUCCESS);
pub const BALANCE_ENQUIRY: Endpoint =
    Endpoint::gateway("balance enquiry", "/api/Spay/BalanceEnquiry", LIST_SUCCESS);
pub const STATEMENT: Endpoint =
    Endpoint::gateway("statement", "/api/Spay/GetStatement", LIST_SUCCESS);
pub const INFLOWS: Endpoint = Endpoint::requery(
    "inflow requery",
    Method::GET,
    "/NIPRequery/api/GetTransactionController/GetTransactionByAccount",
);
pub const ACCOUNT_INFLOWS: Endpoint = Endpoint::requery(
    "account inflow requery",
    Method::POST,
    "/NIPrequeryV2/api/v1.0/NIP/FetchTransactionStatus",
);
pub const SESSION_INFLOWS: Endpoint = Endpoint::requery(
    "session inflow requery",
    Method::POST,
    "/NIPrequeryV2/api/v1.0/NIP/FetchPreviousTransactionsStatus",
);

const REQUEST_TYPE_INTERBANK_TRANSFER: i32 = 160;
const REQUEST_TYPE_INTRABANK_TRANSFER: i32 = 110;
const REQUEST_TYPE_INTRABANK_NAME_ENQUIRY: i32 = 219;
const REQUEST_TYPE_INTERBANK_NAME_ENQUIRY: i32 = 161;
const REQUEST_TYPE_LIST_BANKS: i32 = 152;
const REQUEST_TYPE_BALANCE: i32 = 151;
const REQUEST_TYPE_STATEMENT: i32 = 153;

/// Location sent by calls that are not tied to a customer action.
const UNSPECIFIED_LOCATION: &str = "N/A";

const RANDOM_REFERENCE_LEN: usize = 15;

fn millis_reference() -> String {
    Utc::now().timestamp_millis().to_string()
}

fn random_reference() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(RANDOM_REFERENCE_LEN);
    id
}

fn date_param(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn require(value: &str, name: &str) -> Result<(), SpayError> {
    if value.trim().is_empty() {
        return Err(SpayError::InvalidArgument(format!("{name} must not be empty")));
    }
    Ok(())
}

impl<T: Transport> SpayClient<T> {
    pub fn transfer_cost(&self) -> f64 {
        self.config.transfer_cost
    }

    pub fn origin_account(&self) -> &str {
        &self.config.from_account
    }

    pub fn bank_code(&self) -> &'static str {
        BANK_CODE
    }

    fn base_request(&self, reference_id: String, request_type: i32, translocation: &str) -> BaseRequest {
        let translocation = if translocation.is_empty() {
            self.config.translocation.clone()
        } else {
            translocation.to_owned()
        };
        BaseRequest {
            reference_id,
            request_type,
            translocation,
        }
    }

    /// Transfer to an account at another bank.
    ///
    /// # Errors
    ///
    /// [`SpayError::Business`] carries [`common::ErrorCode::InsufficientFunds`]
    /// when the origin account cannot cover the amount.
    pub async fn interbank_transfer(
        &self,
        transfer: &InterBankTransfer,
    ) -> Result<InterBankTransferResult, SpayError> {
        require(&transfer.to_account, "to_account")?;
        require(&transfer.destination_bank_code, "destination_bank_code")?;

        let payload = InterBankTransferPayload {
            base: self.base_request(
                transfer.reference.clone(),
                REQUEST_TYPE_INTERBANK_TRANSFER,
                &transfer.translocation,
            ),
            session_id: transfer.name_enquiry_session_id.clone(),
            from_account: self.config.from_account.clone(),
            to_account: transfer.to_account.clone(),
            amount: transfer.amount.clone(),
            destination_bank_code: transfer.destination_bank_code.clone(),
            ne_response: transfer.ne_response.clone(),
            beneficiary_name: transfer.beneficiary_name.clone(),
            payment_reference: transfer.payment_reference.clone(),
            teller_id: transfer.teller_id.clone(),
            remarks: transfer.remarks.clone(),
        };

        let result: InterBankTransferResult = self.execute(&INTERBANK_TRANSFER, &payload).await?;
        info!(reference = %payload.base.reference_id, "interbank transfer completed");
        Ok(result)
    }

    /// Transfer between two accounts held at the gateway's own bank.
    ///
    /// An empty reference is replaced by a random 15-character id and an
    /// empty teller id by the configured one.
    ///
    /// # Errors
    ///
    /// [`SpayError::InvalidArgument`] for a missing destination or an amount
    /// that is negative or not finite.
    pub async fn intrabank_transfer(
        &self,
        transfer: &IntraBankTransfer,
    ) -> Result<IntraBankTransferResult, SpayError> {
        require(&transfer.to_account, "to_account")?;
        if !transfer.amount.is_finite() || transfer.amount < 0.0 {
            return Err(SpayError::InvalidArgument(format!(
                "amount must be a finite, non-negative value, got {}",
                transfer.amount
            )));
        }

        let reference_id = if transfer.reference_id.is_empty() {
            random_reference()
        } else {
            transfer.reference_id.clone()
        };
        let teller_id = if transfer.teller_id.is_empty() {
            self.config.teller_id.clone()
        } else {
            transfer.teller_id.clone()
        };

        let payload = IntraBankTransferPayload {
            base: self.base_request(
                reference_id,
                REQUEST_TYPE_INTRABANK_TRANSFER,
                &transfer.translocation,
            ),
            amt: format!("{:.2}", transfer.amount),
            teller_id,
            from_account: self.config.from_account.clone(),
            to_account: transfer.to_account.clone(),
            payment_ref: transfer.payment_ref.clone(),
            remarks: transfer.remarks.clone(),
        };

        let result: IntraBankTransferResult = self.execute(&INTRABANK_TRANSFER, &payload).await?;
        info!(reference = %payload.base.reference_id, "intrabank transfer completed");
        Ok(result)
    }

    /// Resolve the holder of an account at the gateway's own bank.
    pub async fn intrabank_name_enquiry(
        &self,
        account_number: &str,
    ) -> Result<IntraBankNameEnquiry, SpayError> {
        require(account_number, "account_number")?;
        let payload = IntraBankNameEnquiryPayload {
            base: self.base_request(millis_reference(), REQUEST_TYPE_INTRABANK_NAME_ENQUIRY, ""),
            nuban: account_number.to_owned(),
        };
        let envelope: OperationEnvelope<IntraBankNameEnquiry> =
            self.execute(&INTRABANK_NAME_ENQUIRY, &payload).await?;
        Ok(envelope.data)
    }

    /// Resolve the holder of an account at another bank. The returned
    /// `session_id` feeds [`InterBankTransfer::name_enquiry_session_id`].
    pub async fn interbank_name_enquiry(
        &self,
        account_number: &str,
        bank_code: &str,
    ) -> Result<InterBankNameEnquiry, SpayError> {
        require(account_number, "account_number")?;
        require(bank_code, "bank_code")?;
        let payload = InterBankNameEnquiryPayload {
            base: self.base_request(random_reference(), REQUEST_TYPE_INTERBANK_NAME_ENQUIRY, ""),
            to_account: account_number.to_owned(),
            destination_bank_code: bank_code.to_owned(),
        };
        let envelope: OperationEnvelope<InterBankNameEnquiry> =
            self.execute(&INTERBANK_NAME_ENQUIRY, &payload).await?;
        Ok(envelope.data)
    }

    /// Banks reachable for interbank transfers.
    pub async fn list_banks(&self) -> Result<Vec<Bank>, SpayError> {
        self.embedded_operation(&LIST_BANKS, REQUEST_TYPE_LIST_BANKS, UNSPECIFIED_LOCATION)
            .await
    }

    /// Balance of the origin account, as returned by the gateway.
    pub async fn balance_enquiry(&self) -> Result<Value, SpayError> {
        self.embedded_operation(&BALANCE_ENQUIRY, REQUEST_TYPE_BALANCE, "")
            .await
    }

    /// Statement of the origin account, as returned by the gateway.
    pub async fn statement(&self) -> Result<Value, SpayError> {
        self.embedded_operation(&STATEMENT, REQUEST_TYPE_STATEMENT, UNSPECIFIED_LOCATION)
            .await
    }

    /// Calls whose `data.response` field is itself a JSON document.
    async fn embedded_operation<R: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        request_type: i32,
        translocation: &str,
    ) -> Result<R, SpayError> {
        let base = self.base_request(millis_reference(), request_type, translocation);
        let envelope: OperationEnvelope<OperationData> = self.execute(endpoint, &base).await?;
        serde_json::from_str(&envelope.data.response).map_err(SpayError::decode(endpoint.name))
    }

    /// Inflows credited to the origin account on `date`.
    pub async fn list_inflows(&self, date: NaiveDate) -> Result<InflowList, SpayError> {
        let query = InflowQuery {
            account_number: self.config.from_account.clone(),
            start_date: date_param(date),
            end_date: date_param(date),
        };
        self.execute(&INFLOWS, &query).await
    }

    /// [`SpayClient::list_inflows`] for the local calendar day.
    pub async fn list_inflows_for_today(&self) -> Result<InflowList, SpayError> {
        self.list_inflows(Local::now().date_naive()).await
    }

    /// Current inflow status for `account_number`. Entries whose account is
    /// the origin account are dropped.
    pub async fn list_account_inflows(
        &self,
        account_number: &str,
    ) -> Result<AccountInflows, SpayError> {
        require(account_number, "account_number")?;
        let query = AccountInflowQuery {
            account_number: account_number.to_owned(),
            session_id: String::new(),
        };
        let inflows = self.execute(&ACCOUNT_INFLOWS, &query).await?;
        Ok(self.without_origin(inflows))
    }

    /// Inflows matching a NIP session id from `date` onwards. Entries whose
    /// account is the origin account are dropped.
    pub async fn query_inflows_by_session(
        &self,
        session_id: &str,
        date: NaiveDate,
    ) -> Result<AccountInflows, SpayError> {
        require(session_id, "session_id")?;
        let query = SessionInflowQuery {
            session_id: session_id.to_owned(),
            start_date: date_param(date),
            page_number: 1,
        };
        let inflows = self.execute(&SESSION_INFLOWS, &query).await?;
        Ok(self.without_origin(inflows))
    }

    fn without_origin(&self, mut inflows: AccountInflows) -> AccountInflows {
        inflows
            .content
            .retain(|item| item.account_number != self.config.from_account);
        inflows
    }
}
