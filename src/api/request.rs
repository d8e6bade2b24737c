//! API request helpers
//!
//! Wrappers around the JSON body and query string extractors that turn
//! rejections into the uniform error envelope before any handler runs.

use axum::extract::FromRequest;
use axum::extract::FromRequestParts;
use axum::extract::Json;
use axum::extract::Query;
use axum::extract::Request;
use axum::extract::rejection::JsonRejection;
use axum::extract::rejection::QueryRejection;
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use super::Error;

fn parse_json<J>(json: Result<Json<J>, JsonRejection>) -> Result<J, Error> {
    match json {
        Ok(Json(json)) => Ok(json),
        Err(err) => match err {
            JsonRejection::JsonDataError(err) => {
                Err(Error::bad_request(format!("Data error: {err}")))
            }
            JsonRejection::JsonSyntaxError(err) => {
                Err(Error::bad_request(format!("JSON syntax error: {err}")))
            }
            JsonRejection::MissingJsonContentType(_err) => Err(Error::bad_request(
                "Missing `application/json` content type",
            )),
            JsonRejection::BytesRejection(err) => Err(Error::bad_request(format!(
                "Invalid characters in JSON: {err}"
            ))),
            err => Err(Error::bad_request(format!("Unknown JSON error: {err}"))),
        },
    }
}

/// Wrapper for the JSON extractor
pub struct Form<F>(pub F);

impl<S, F> FromRequest<S> for Form<F>
where
    S: Send + Sync,
    F: DeserializeOwned + Send,
{
    type Rejection = Error;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let json = Result::<Json<F>, JsonRejection>::from_request(req, state)
            .await
            .map_err(|_| Error::internal_server_error("Could not extract form"))?;

        parse_json(json).map(Form)
    }
}

fn parse_query<P>(query: Result<Query<P>, QueryRejection>) -> Result<P, Error> {
    match query {
        Ok(Query(query)) => Ok(query),
        Err(err) => match err {
            QueryRejection::FailedToDeserializeQueryString(err) => {
                Err(Error::bad_request(format!("Invalid query parameter: {err}")))
            }
            err => Err(Error::bad_request(format!("Unknown query error: {err}"))),
        },
    }
}

/// Wrapper for the query string extractor
pub struct QueryParameters<P>(pub P);

impl<S, P> FromRequestParts<S> for QueryParameters<P>
where
    S: Send + Sync,
    P: DeserializeOwned + Send,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let query = Result::<Query<P>, QueryRejection>::from_request_parts(parts, state)
            .await
            .map_err(|_| Error::internal_server_error("Could not extract query"))?;

        parse_query(query).map(QueryParameters)
    }
}
