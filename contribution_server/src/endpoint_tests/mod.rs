mod contributions;
mod helpers;
mod mocks;
mod razorpay;
