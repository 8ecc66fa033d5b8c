pub mod d400_portfolio_summary;
