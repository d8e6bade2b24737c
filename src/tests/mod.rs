mod helper;
mod invalid_request;
mod status;
